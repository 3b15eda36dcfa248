//! JSON output formatting

use serde::Serialize;
use songprint_core::{MatchDiagnostics, MatchResult};

/// Auto-label suggestion for one unlabeled file
///
/// `confidence` is derived from the unweighted raw score, so a boosted
/// reference match never looks more similar than it actually is.
#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub target_file: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_reference: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<MatchDiagnostics>,
}

impl Suggestion {
    pub fn new(
        target_file: &str,
        result: Option<MatchResult>,
        diagnostics: Option<MatchDiagnostics>,
    ) -> Self {
        match result {
            Some(m) => Self {
                target_file: target_file.to_string(),
                matched: true,
                suggested_name: Some(m.matched_file),
                source_folder: Some(m.matched_folder),
                confidence: Some(m.raw_score),
                weighted_score: Some(m.weighted_score),
                is_reference: Some(m.is_reference),
                diagnostics,
            },
            None => Self {
                target_file: target_file.to_string(),
                matched: false,
                suggested_name: None,
                source_folder: None,
                confidence: None,
                weighted_score: None,
                is_reference: None,
                diagnostics,
            },
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}
