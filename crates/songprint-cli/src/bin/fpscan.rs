//! fpscan - Fingerprint every audio file in a folder
//!
//! Usage: fpscan <folder> [--algorithm spectral] [--config config.toml]

use anyhow::{Context, Result};
use clap::Parser;
use songprint_cache::fingerprint_folder;
use songprint_cli::output::print_json;
use songprint_core::{Algorithm, EngineConfig};
use std::path::Path;
use std::sync::atomic::AtomicBool;

#[derive(Parser, Debug)]
#[command(name = "fpscan")]
#[command(about = "Generate audio fingerprints for a practice folder", long_about = None)]
struct Args {
    /// Folder containing audio files
    folder: String,

    /// Fingerprint algorithm (spectral, lightweight, chroma, constellation)
    #[arg(short, long)]
    algorithm: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Default: no logs (clean JSON output for parsing)
    // Verbose: show Info level logs for debugging
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

    let folder = Path::new(&args.folder);
    if !folder.is_dir() {
        anyhow::bail!("Folder not found: {}", folder.display());
    }

    let cancel = AtomicBool::new(false);
    let report = fingerprint_folder(folder, algorithm, &config.dsp, &cancel)?;

    print_json(&report);

    Ok(())
}
