//! fplabel - Suggest a name for an unlabeled recording
//!
//! Fingerprints the target file (through its folder's cache), matches it
//! against every known folder's fingerprints, and prints the suggestion as
//! JSON. Renaming and persistence of the suggestion stay with the caller.
//!
//! Usage: fplabel <target_audio> --library <folder>... [--threshold 0.8]

use anyhow::{Context, Result};
use clap::Parser;
use songprint_cache::{collect_candidates, load_library, FolderCache};
use songprint_cli::output::{print_json, Suggestion};
use songprint_core::{Algorithm, CrossFolderMatcher, EngineConfig};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fplabel")]
#[command(about = "Suggest which known song an unlabeled recording is", long_about = None)]
struct Args {
    /// Unlabeled audio file
    target: String,

    /// Known practice folders to match against (repeatable); defaults to
    /// the folders listed in the config file
    #[arg(short, long)]
    library: Vec<String>,

    /// Fingerprint algorithm (spectral, lightweight, chroma, constellation)
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Minimum weighted score to accept a match, overriding the config
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Include the full scoring trace in the output
    #[arg(short, long)]
    diagnostics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Default: no logs (clean JSON output for parsing)
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path))?,
        None => EngineConfig::default(),
    };

    let algorithm = match &args.algorithm {
        Some(name) => name.parse::<Algorithm>()?,
        None => config.algorithm,
    };
    let threshold = args.threshold.unwrap_or(config.matching.threshold);

    let target_path = Path::new(&args.target);
    if !target_path.is_file() {
        anyhow::bail!("Target file not found: {}", target_path.display());
    }
    let target_name = target_path
        .file_name()
        .and_then(|n| n.to_str())
        .context("target has no usable file name")?
        .to_string();
    let target_folder = target_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // Fingerprint through the folder cache so repeated labeling passes
    // reuse the stored vector
    let mut cache = FolderCache::load(target_folder);
    let target_vector = cache.get_or_generate(&target_name, algorithm, &config.dsp)?;
    cache.save()?;

    let mut folders: Vec<PathBuf> = if args.library.is_empty() {
        config.library.folders.iter().map(PathBuf::from).collect()
    } else {
        args.library.iter().map(PathBuf::from).collect()
    };
    if !folders.iter().any(|f| f == target_folder) {
        folders.push(target_folder.to_path_buf());
    }

    let caches = load_library(&folders);
    let mut candidates = collect_candidates(&caches);

    // The target must not match its own cache entry
    let target_folder_name = target_folder.display().to_string();
    candidates.retain(|c| !(c.file == target_name && c.folder == target_folder_name));

    log::info!(
        "matching {} against {} candidates (threshold {:.2})",
        target_name,
        candidates.len(),
        threshold
    );

    let matcher = CrossFolderMatcher::new(&config.matching);
    let (result, diagnostics) = matcher.find_best_match_with_diagnostics(
        &target_name,
        &target_vector,
        &candidates,
        threshold,
    )?;

    let suggestion = Suggestion::new(
        &target_name,
        result,
        args.diagnostics.then_some(diagnostics),
    );
    print_json(&suggestion);

    Ok(())
}
