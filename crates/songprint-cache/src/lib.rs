//! songprint Cache - Per-folder fingerprint persistence
//!
//! Each practice folder owns one cache file mapping audio file identity to
//! its fingerprint, invalidated by a content signature of the source file.
//! Folders have independent lifecycles and couple only at match time, when
//! many folders' sets are loaded and flattened into matcher candidates.

pub mod batch;
pub mod format;
pub mod signature;
pub mod store;

pub use batch::{collect_candidates, fingerprint_folder, load_library, FileFailure, ScanReport};
pub use format::{CacheEntry, CacheFormat, FolderFingerprintSet, FORMAT_VERSION};
pub use signature::FileSignature;
pub use store::FolderCache;
