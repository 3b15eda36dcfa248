//! Match diagnostics
//!
//! A structured trace produced alongside every matching call, replacing
//! console-style debug tracing: which candidates scored what, which were
//! skipped and why, what landed near the threshold, and what was selected.

use crate::fingerprint::Algorithm;
use serde::Serialize;

/// One candidate's score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub file: String,
    pub folder: String,
    pub raw_score: f32,
    pub boost: f32,
    pub weighted_score: f32,
    pub is_reference: bool,
    /// Distinct folders carrying this file identity
    pub folder_count: usize,
}

/// A candidate excluded from scoring, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkippedCandidate {
    pub file: String,
    pub folder: String,
    pub reason: String,
}

/// Full trace of one `find_best_match` call
#[derive(Debug, Clone, Serialize)]
pub struct MatchDiagnostics {
    pub algorithm: Algorithm,
    pub target_len: usize,
    pub threshold: f32,
    /// Total candidates considered (including skipped ones)
    pub candidate_count: usize,
    /// Top candidates by weighted score
    pub top: Vec<ScoredCandidate>,
    /// Candidates scoring between 50% and 100% of the threshold, for tuning
    pub near_threshold: Vec<ScoredCandidate>,
    pub skipped: Vec<SkippedCandidate>,
    /// The accepted selection, when one met the threshold
    pub selected: Option<ScoredCandidate>,
}
