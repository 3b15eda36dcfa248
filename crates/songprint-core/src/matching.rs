//! Cross-folder matching
//!
//! Scores a target fingerprint against candidates drawn from many folders,
//! applies trust boosts for reference folders and songs, and selects the
//! best candidate above a threshold. Candidates are assembled explicitly by
//! the caller; the matcher performs no folder discovery of its own.

use crate::config::MatchConfig;
use crate::diagnostics::{MatchDiagnostics, ScoredCandidate, SkippedCandidate};
use crate::error::{EngineError, Result};
use crate::fingerprint::FingerprintVector;
use crate::scoring;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[cfg(test)]
mod tests;

/// One candidate recording from some folder's fingerprint set
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Filename, scoped to its owning folder
    pub file: String,
    pub folder: String,
    pub vector: FingerprintVector,
    /// The folder is the designated reference folder
    pub is_reference_folder: bool,
    /// The folder carries its own narrower reference flag
    pub has_local_reference: bool,
    /// This specific recording is flagged as a reference song
    pub is_reference_song: bool,
}

/// Accepted match for a target fingerprint
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub target_file: String,
    pub matched_file: String,
    pub matched_folder: String,
    /// Unweighted cosine similarity in [0, 1]
    pub raw_score: f32,
    /// Raw score after trust boosts, clamped to 1.0
    pub weighted_score: f32,
    pub is_reference: bool,
    /// Distinct folders containing the matched file identity (diagnostic)
    pub folder_count: usize,
}

/// Cross-folder matcher
pub struct CrossFolderMatcher {
    config: MatchConfig,
}

impl CrossFolderMatcher {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Boosted score for a candidate's flags, clamped to 1.0
    ///
    /// Boosts stack additively; the clamp keeps a heavily boosted
    /// near-perfect raw score from exceeding the scale the threshold is
    /// expressed in.
    fn weighted_score(&self, raw: f32, boost: f32) -> f32 {
        (raw * (1.0 + boost)).min(1.0)
    }

    fn boost_for(&self, candidate: &Candidate) -> f32 {
        let mut boost = 0.0;
        if candidate.is_reference_folder {
            boost += self.config.reference_folder_boost;
        }
        if candidate.has_local_reference {
            boost += self.config.local_reference_boost;
        }
        if candidate.is_reference_song {
            boost += self.config.reference_song_boost;
        }
        boost
    }

    /// Find the best match for `target` among `candidates`
    ///
    /// Returns `Ok(None)` when no candidate's weighted score reaches
    /// `threshold`; errors only for an invalid target vector.
    pub fn find_best_match(
        &self,
        target_file: &str,
        target: &FingerprintVector,
        candidates: &[Candidate],
        threshold: f32,
    ) -> Result<Option<MatchResult>> {
        self.find_best_match_with_diagnostics(target_file, target, candidates, threshold)
            .map(|(result, _)| result)
    }

    /// Like `find_best_match`, also returning the full scoring trace
    pub fn find_best_match_with_diagnostics(
        &self,
        target_file: &str,
        target: &FingerprintVector,
        candidates: &[Candidate],
        threshold: f32,
    ) -> Result<(Option<MatchResult>, MatchDiagnostics)> {
        if target.values.is_empty() {
            return Err(EngineError::InvalidTarget("empty target vector".into()));
        }
        if let Err(e) = target.validate() {
            return Err(EngineError::InvalidTarget(e.to_string()));
        }

        // Distinct folders per file identity, across the whole candidate set
        let mut folders_by_file: HashMap<&str, HashSet<&str>> = HashMap::new();
        for c in candidates {
            folders_by_file
                .entry(c.file.as_str())
                .or_default()
                .insert(c.folder.as_str());
        }

        let mut scored: Vec<ScoredCandidate> = Vec::with_capacity(candidates.len());
        let mut skipped: Vec<SkippedCandidate> = Vec::new();

        for candidate in candidates {
            let raw = match scoring::score(target, &candidate.vector) {
                Ok(raw) => raw,
                // A foreign-algorithm candidate is skipped, not fatal
                Err(e @ EngineError::AlgorithmMismatch { .. })
                | Err(e @ EngineError::LengthMismatch { .. }) => {
                    log::debug!(
                        "skipping candidate {}/{}: {}",
                        candidate.folder,
                        candidate.file,
                        e
                    );
                    skipped.push(SkippedCandidate {
                        file: candidate.file.clone(),
                        folder: candidate.folder.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let boost = self.boost_for(candidate);
            let is_reference = candidate.is_reference_folder
                || candidate.has_local_reference
                || candidate.is_reference_song;

            scored.push(ScoredCandidate {
                file: candidate.file.clone(),
                folder: candidate.folder.clone(),
                raw_score: raw,
                boost,
                weighted_score: self.weighted_score(raw, boost),
                is_reference,
                folder_count: folders_by_file
                    .get(candidate.file.as_str())
                    .map(|s| s.len())
                    .unwrap_or(1),
            });
        }

        // Best first: weighted score, then reference preference, then
        // breadth of folder coverage, then filename for determinism
        scored.sort_by(|a, b| {
            b.weighted_score
                .partial_cmp(&a.weighted_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.is_reference.cmp(&a.is_reference))
                .then_with(|| b.folder_count.cmp(&a.folder_count))
                .then_with(|| a.file.cmp(&b.file))
        });

        let accepted = scored
            .first()
            .filter(|best| best.weighted_score >= threshold)
            .cloned();

        if let Some(best) = &accepted {
            log::debug!(
                "matched {} -> {}/{} (raw {:.4}, weighted {:.4})",
                target_file,
                best.folder,
                best.file,
                best.raw_score,
                best.weighted_score
            );
        } else if let Some(best) = scored.first() {
            log::debug!(
                "no match for {}: best weighted {:.4} below threshold {:.4}",
                target_file,
                best.weighted_score,
                threshold
            );
        }

        let near_lo = threshold * self.config.near_threshold_factor;
        let near_threshold: Vec<ScoredCandidate> = scored
            .iter()
            .filter(|c| c.weighted_score >= near_lo && c.weighted_score < threshold)
            .cloned()
            .collect();

        let diagnostics = MatchDiagnostics {
            algorithm: target.algorithm,
            target_len: target.len(),
            threshold,
            candidate_count: candidates.len(),
            top: scored
                .iter()
                .take(self.config.top_candidates)
                .cloned()
                .collect(),
            near_threshold,
            skipped,
            selected: accepted.clone(),
        };

        let result = accepted.map(|best| MatchResult {
            target_file: target_file.to_string(),
            matched_file: best.file,
            matched_folder: best.folder,
            raw_score: best.raw_score,
            weighted_score: best.weighted_score,
            is_reference: best.is_reference,
            folder_count: best.folder_count,
        });

        Ok((result, diagnostics))
    }
}
