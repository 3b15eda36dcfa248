//! Persisted cache format
//!
//! One cache file per folder, mapping file identity to signature,
//! algorithm and fingerprint values. JSON is the primary format, BSON the
//! compact alternate; readers auto-detect by extension. Unknown fields are
//! ignored on read so future versions can add fields without breaking old
//! binaries.

use crate::signature::FileSignature;
use serde::{Deserialize, Serialize};
use songprint_core::{Algorithm, EngineError, FingerprintVector};
use std::collections::BTreeMap;

/// Current cache format version
pub const FORMAT_VERSION: &str = "1.0";

/// On-disk file names, one of which lives inside each fingerprinted folder
pub const CACHE_FILE_JSON: &str = ".songprint.json";
pub const CACHE_FILE_BSON: &str = ".songprint.bson";

/// Serialization format of a folder's cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormat {
    #[default]
    Json,
    Bson,
}

impl CacheFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            CacheFormat::Json => CACHE_FILE_JSON,
            CacheFormat::Bson => CACHE_FILE_BSON,
        }
    }
}

/// One cached fingerprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content marker of the source file, for invalidation only
    pub signature: FileSignature,
    pub algorithm: Algorithm,
    pub values: Vec<f32>,
    /// This recording is a trusted reference take
    #[serde(default)]
    pub is_reference_song: bool,
    /// RFC 3339 generation timestamp
    #[serde(default)]
    pub fingerprinted_at: String,
}

impl CacheEntry {
    /// Reconstruct the fingerprint vector, re-checking the length invariant
    pub fn vector(&self) -> Result<FingerprintVector, EngineError> {
        FingerprintVector::new(self.algorithm, self.values.clone())
    }
}

/// All cached fingerprints for one folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderFingerprintSet {
    #[serde(default = "default_version")]
    pub version: String,
    /// This folder is the designated reference folder
    #[serde(default)]
    pub is_reference_folder: bool,
    /// This folder carries its own narrower reference flag
    #[serde(default)]
    pub has_local_reference: bool,
    /// RFC 3339 timestamp of the last save
    #[serde(default)]
    pub updated_at: Option<String>,
    /// File identity -> cached fingerprint
    #[serde(default)]
    pub entries: BTreeMap<String, CacheEntry>,
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl Default for FolderFingerprintSet {
    fn default() -> Self {
        Self {
            version: default_version(),
            is_reference_folder: false,
            has_local_reference: false,
            updated_at: None,
            entries: BTreeMap::new(),
        }
    }
}

impl FolderFingerprintSet {
    /// Serialize in the given format
    pub fn to_bytes(&self, format: CacheFormat) -> Result<Vec<u8>, EngineError> {
        match format {
            CacheFormat::Json => serde_json::to_vec_pretty(self)
                .map_err(|e| EngineError::CacheData(format!("serialization failed: {e}"))),
            CacheFormat::Bson => bson::to_vec(self)
                .map_err(|e| EngineError::CacheData(format!("serialization failed: {e}"))),
        }
    }

    /// Deserialize from bytes in the given format
    pub fn from_bytes(bytes: &[u8], format: CacheFormat) -> Result<Self, EngineError> {
        match format {
            CacheFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| EngineError::CacheData(format!("parse failed: {e}"))),
            CacheFormat::Bson => bson::from_slice(bytes)
                .map_err(|e| EngineError::CacheData(format!("parse failed: {e}"))),
        }
    }
}
