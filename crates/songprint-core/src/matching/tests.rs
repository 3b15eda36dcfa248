//! Tests for cross-folder matching

use super::*;
use crate::config::MatchConfig;
use crate::fingerprint::Algorithm;

fn spectral(values: Vec<f32>) -> FingerprintVector {
    FingerprintVector::new(Algorithm::Spectral, values).unwrap()
}

fn flat(fill: f32) -> FingerprintVector {
    spectral(vec![fill; Algorithm::Spectral.vector_len()])
}

fn candidate(file: &str, folder: &str, vector: FingerprintVector) -> Candidate {
    Candidate {
        file: file.to_string(),
        folder: folder.to_string(),
        vector,
        is_reference_folder: false,
        has_local_reference: false,
        is_reference_song: false,
    }
}

/// Vector at a controlled cosine distance from the all-ones vector
fn perturbed(amount: f32) -> FingerprintVector {
    let mut values = vec![1.0; Algorithm::Spectral.vector_len()];
    values[0] = 1.0 - amount;
    values[1] = 1.0 + amount;
    spectral(values)
}

#[test]
fn test_reference_folder_wins_documented_scenario() {
    // Three candidates: two close takes in an ordinary folder, and the
    // reference folder's copy of the closest take. The +15% boost clamps
    // the reference copy to a perfect weighted score and it wins.
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);
    assert_eq!(target.len(), 144);

    let close = perturbed(0.2);
    let further = perturbed(2.0);

    let mut reference = candidate("song.wav", "sessions/2024-02-12", close.clone());
    reference.is_reference_folder = true;

    let candidates = vec![
        candidate("song.wav", "sessions/2024-01-05", close.clone()),
        candidate("other.wav", "sessions/2024-01-05", further),
        reference,
    ];

    let (result, diagnostics) = matcher
        .find_best_match_with_diagnostics("new_take.wav", &target, &candidates, 0.8)
        .unwrap();

    let result = result.unwrap();
    assert_eq!(result.matched_folder, "sessions/2024-02-12");
    assert!(result.is_reference);
    assert_eq!(result.weighted_score, 1.0);
    // Raw score is unboosted and identical to the non-reference copy
    let raw = scoring::score(&target, &close).unwrap();
    assert!((result.raw_score - raw).abs() < 1e-6);

    assert_eq!(diagnostics.candidate_count, 3);
    assert_eq!(diagnostics.top.len(), 3);
    assert!(diagnostics.selected.is_some());
}

#[test]
fn test_below_threshold_is_none_not_error() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);

    // Nearly orthogonal candidate: high threshold cannot be met
    let mut values = vec![0.0; Algorithm::Spectral.vector_len()];
    values[0] = 1.0;
    let candidates = vec![candidate("far.wav", "folder", spectral(values))];

    let result = matcher
        .find_best_match("target.wav", &target, &candidates, 0.9)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_silent_target_matches_nothing() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(0.0);

    let candidates = vec![
        candidate("a.wav", "f1", flat(1.0)),
        candidate("b.wav", "f2", perturbed(0.5)),
    ];

    let (result, diagnostics) = matcher
        .find_best_match_with_diagnostics("silence.wav", &target, &candidates, 0.01)
        .unwrap();

    assert!(result.is_none());
    assert!(diagnostics.top.iter().all(|c| c.raw_score == 0.0));
}

#[test]
fn test_reference_preferred_on_equal_weighted_score() {
    // Zero boosts so the reference flag changes nothing but the tie-break
    let config = MatchConfig {
        reference_folder_boost: 0.0,
        local_reference_boost: 0.0,
        reference_song_boost: 0.0,
        ..MatchConfig::default()
    };
    let matcher = CrossFolderMatcher::new(&config);
    let target = flat(1.0);

    let mut reference = candidate("ref.wav", "f2", flat(2.0));
    reference.is_reference_song = true;

    let candidates = vec![candidate("plain.wav", "f1", flat(2.0)), reference];

    let result = matcher
        .find_best_match("t.wav", &target, &candidates, 0.5)
        .unwrap()
        .unwrap();
    assert_eq!(result.matched_file, "ref.wav");
    assert!(result.is_reference);
}

#[test]
fn test_boosted_reference_beats_equal_raw_score() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);

    let mut reference = candidate("ref.wav", "f2", perturbed(0.3));
    reference.is_reference_song = true;

    let candidates = vec![candidate("plain.wav", "f1", perturbed(0.3)), reference];

    let result = matcher
        .find_best_match("t.wav", &target, &candidates, 0.5)
        .unwrap()
        .unwrap();
    assert_eq!(result.matched_file, "ref.wav");
    assert!(result.weighted_score > result.raw_score);
}

#[test]
fn test_folder_count_tie_break() {
    let config = MatchConfig {
        reference_folder_boost: 0.0,
        local_reference_boost: 0.0,
        reference_song_boost: 0.0,
        ..MatchConfig::default()
    };
    let matcher = CrossFolderMatcher::new(&config);
    let target = flat(1.0);

    // "widespread.wav" appears in two folders, "b_single.wav" in one;
    // all score identically
    let candidates = vec![
        candidate("widespread.wav", "f1", flat(1.0)),
        candidate("widespread.wav", "f2", flat(1.0)),
        candidate("b_single.wav", "f3", flat(1.0)),
    ];

    let result = matcher
        .find_best_match("t.wav", &target, &candidates, 0.5)
        .unwrap()
        .unwrap();
    assert_eq!(result.matched_file, "widespread.wav");
    assert_eq!(result.folder_count, 2);
}

#[test]
fn test_lexicographic_tie_break_is_deterministic() {
    let config = MatchConfig {
        reference_folder_boost: 0.0,
        local_reference_boost: 0.0,
        reference_song_boost: 0.0,
        ..MatchConfig::default()
    };
    let matcher = CrossFolderMatcher::new(&config);
    let target = flat(1.0);

    let candidates = vec![
        candidate("zeta.wav", "f1", flat(1.0)),
        candidate("alpha.wav", "f2", flat(1.0)),
    ];

    let result = matcher
        .find_best_match("t.wav", &target, &candidates, 0.5)
        .unwrap()
        .unwrap();
    assert_eq!(result.matched_file, "alpha.wav");
}

#[test]
fn test_foreign_algorithm_candidates_are_skipped() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);

    let chroma = FingerprintVector::new(
        Algorithm::Chroma,
        vec![1.0; Algorithm::Chroma.vector_len()],
    )
    .unwrap();

    let candidates = vec![
        candidate("chroma.wav", "f1", chroma),
        candidate("good.wav", "f2", flat(1.0)),
    ];

    let (result, diagnostics) = matcher
        .find_best_match_with_diagnostics("t.wav", &target, &candidates, 0.5)
        .unwrap();

    assert_eq!(result.unwrap().matched_file, "good.wav");
    assert_eq!(diagnostics.skipped.len(), 1);
    assert_eq!(diagnostics.skipped[0].file, "chroma.wav");
}

#[test]
fn test_empty_target_is_a_hard_error() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = FingerprintVector {
        algorithm: Algorithm::Spectral,
        values: Vec::new(),
    };

    let err = matcher.find_best_match("t.wav", &target, &[], 0.5);
    assert!(matches!(err, Err(EngineError::InvalidTarget(_))));
}

#[test]
fn test_no_candidates_is_none() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);
    let result = matcher
        .find_best_match("t.wav", &target, &[], 0.1)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_weighted_score_monotonicity() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());

    // Non-decreasing in boost for fixed raw score
    let raws = [0.0, 0.3, 0.7, 0.95, 1.0];
    let boosts = [0.0, 0.1, 0.15, 0.25, 0.35];
    for &raw in &raws {
        let mut prev = 0.0f32;
        for &boost in &boosts {
            let w = matcher.weighted_score(raw, boost);
            assert!(w >= prev);
            prev = w;
        }
    }

    // Non-decreasing in raw score for fixed boost
    for &boost in &boosts {
        let mut prev = 0.0f32;
        for &raw in &raws {
            let w = matcher.weighted_score(raw, boost);
            assert!(w >= prev);
            prev = w;
        }
    }

    // Clamped at 1.0
    assert_eq!(matcher.weighted_score(0.9996, 0.35), 1.0);
}

#[test]
fn test_silent_clip_end_to_end() {
    // A silent clip fingerprints to an all-zero vector; against a non-zero
    // corpus every raw score is 0.0 and any positive threshold rejects
    use crate::config::DspConfig;
    use crate::fingerprint::FingerprintGenerator;

    let dsp = DspConfig::default();
    let gen = FingerprintGenerator::new(&dsp);
    let silence = vec![0.0f32; dsp.sample_rate as usize * 2];
    let target = gen
        .generate(&silence, dsp.sample_rate, Algorithm::Spectral)
        .unwrap();
    assert!(target.is_zero());

    let tone: Vec<f32> = (0..dsp.sample_rate * 2)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / dsp.sample_rate as f32).sin())
        .collect();
    let corpus = gen
        .generate(&tone, dsp.sample_rate, Algorithm::Spectral)
        .unwrap();

    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let candidates = vec![candidate("tone.wav", "folder", corpus)];

    for threshold in [0.01, 0.5, 0.99] {
        let (result, diagnostics) = matcher
            .find_best_match_with_diagnostics("silence.wav", &target, &candidates, threshold)
            .unwrap();
        assert!(result.is_none());
        assert!(diagnostics.top.iter().all(|c| c.raw_score == 0.0));
    }
}

#[test]
fn test_near_threshold_diagnostics_window() {
    let matcher = CrossFolderMatcher::new(&MatchConfig::default());
    let target = flat(1.0);

    // Roughly 0.5 cosine: half the mass in matching components
    let mut half = vec![0.0; Algorithm::Spectral.vector_len()];
    for (i, v) in half.iter_mut().enumerate() {
        if i % 4 == 0 {
            *v = 1.0;
        }
    }

    let candidates = vec![
        candidate("half.wav", "f1", spectral(half)),
        candidate("exact.wav", "f2", flat(1.0)),
    ];

    let (_, diagnostics) = matcher
        .find_best_match_with_diagnostics("t.wav", &target, &candidates, 0.8)
        .unwrap();

    // cos = 36 / (12 * 6) = 0.5, inside [0.4, 0.8)
    assert_eq!(diagnostics.near_threshold.len(), 1);
    assert_eq!(diagnostics.near_threshold[0].file, "half.wav");
}
