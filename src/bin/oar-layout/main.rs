//! OAR Layout CLI
//!
//! Rebuilds text blocks from recorded per-line recognizer output and manages
//! persisted recognition stores.
//!
//! # Usage
//!
//! ```bash
//! oar-layout merge --input page-lines.json --image page.png --output pretty
//! oar-layout merge --input page-lines.json --width 1200 --height 4000 --output json
//! oar-layout cache --cache-file ocr-cache.json stats
//! oar-layout cache --cache-file ocr-cache.json import other-cache.json
//! ```

mod cli;
mod config;

use clap::{Parser, Subcommand};
use config::{MergeOptions, OutputFormat};
use oar_ocr_layout::core::ParallelPolicy;
use oar_ocr_layout::store::JsonFileStore;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "oar-layout")]
#[command(author = "OAR-OCR Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Text block reconstruction and recognition store tools", long_about = None)]
struct Cli {
    /// Number of worker threads (defaults to number of CPUs)
    #[arg(long, global = true, env = "OAR_WORKERS")]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge recognized lines of one page into blocks
    Merge {
        /// JSON array of recognized lines in page pixel coordinates
        #[arg(long, short)]
        input: PathBuf,

        /// Page image, used only for its dimensions
        #[arg(long, conflicts_with_all = ["width", "height"])]
        image: Option<PathBuf>,

        /// Page width in pixels
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Page height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Layout configuration file (JSON)
        #[arg(long, env = "OAR_LAYOUT_CONFIG")]
        config: Option<PathBuf>,

        /// Join merged lines with a space instead of a zero-width joiner
        #[arg(long)]
        space_separator: bool,

        /// Number of clustering chunks above which chunks are merged in parallel
        #[arg(long, default_value = "2")]
        parallel_chunk_threshold: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Manage a persisted recognition store
    Cache {
        /// Store file
        #[arg(long = "cache-file", default_value = "ocr-cache.json", env = "OAR_CACHE_FILE")]
        cache_file: PathBuf,

        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Add entries from another store file, keeping existing keys
    Import { file: PathBuf },
    /// Write the store to another file
    Export { file: PathBuf },
    /// Remove every stored page
    Purge,
    /// Show store location and size
    Stats,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    oar_ocr_layout::utils::init_tracing();

    let cli = Cli::parse();

    let policy = ParallelPolicy::new().with_max_threads(cli.workers);
    if policy.install_global_thread_pool()? {
        info!("Using {} worker threads", cli.workers.unwrap_or_default());
    }

    match cli.command {
        Commands::Merge {
            input,
            image,
            width,
            height,
            config,
            space_separator,
            parallel_chunk_threshold,
            output,
        } => {
            let policy = policy.with_parallel_chunk_threshold(parallel_chunk_threshold);
            let options = MergeOptions::resolve(
                input,
                image.as_deref(),
                (width, height),
                config.as_deref(),
                space_separator,
                policy,
                output,
            )?;
            info!(
                "Merging {} ({}x{})",
                options.input.display(),
                options.width,
                options.height
            );
            cli::run_merge(&options)?;
        }
        Commands::Cache { cache_file, action } => {
            let store = JsonFileStore::open(&cache_file)?;
            match action {
                CacheAction::Import { file } => cli::import_cache(&store, &file)?,
                CacheAction::Export { file } => cli::export_cache(&store, &file)?,
                CacheAction::Purge => cli::purge_cache(&store)?,
                CacheAction::Stats => cli::cache_stats(&store)?,
            }
        }
    }

    Ok(())
}
