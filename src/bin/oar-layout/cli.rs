//! Command implementations.

use crate::config::{MergeOptions, OutputFormat};
use oar_ocr_layout::core::{OCRError, ZERO_WIDTH_JOINER};
use oar_ocr_layout::domain::{Block, RawLine};
use oar_ocr_layout::pipeline::{LayoutMerger, normalize_lines};
use oar_ocr_layout::store::{JsonFileStore, MemoStore};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Runs layout reconstruction over a recorded recognizer dump.
pub fn run_merge(options: &MergeOptions) -> Result<(), OCRError> {
    let contents = std::fs::read_to_string(&options.input)?;
    let raw: Vec<RawLine> = serde_json::from_str(&contents)?;
    info!(
        "Loaded {} lines from {}",
        raw.len(),
        options.input.display()
    );

    let start = Instant::now();
    let lines = normalize_lines(&raw, options.width, options.height);
    let merger = LayoutMerger::new(&options.layout)
        .with_parallel_chunk_threshold(options.policy.parallel_chunk_threshold);
    let blocks = merger.merge_page(lines, options.width, options.height);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!("Merged into {} blocks in {:.2}ms", blocks.len(), elapsed_ms);

    output_blocks(&blocks, options, raw.len(), elapsed_ms)
}

fn output_blocks(
    blocks: &[Block],
    options: &MergeOptions,
    line_count: usize,
    elapsed_ms: f64,
) -> Result<(), OCRError> {
    match options.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(blocks)?);
        }
        OutputFormat::Pretty => {
            println!("\n=== Layout ===");
            println!("Page size: {}x{}", options.width, options.height);
            println!("Processing time: {:.2}ms", elapsed_ms);
            println!("Lines: {}  Blocks: {}", line_count, blocks.len());
            println!();

            if blocks.is_empty() {
                println!("No text blocks.");
            }
            for (idx, block) in blocks.iter().enumerate() {
                let kind = if block.is_merged { "merged" } else { "line" };
                println!(
                    "[{}] {} {} \"{}\"",
                    idx + 1,
                    kind,
                    block.orientation(),
                    block.text.replace(ZERO_WIDTH_JOINER, " / ")
                );
                println!(
                    "    Box: x={:.4} y={:.4} w={:.4} h={:.4}",
                    block.bbox.x, block.bbox.y, block.bbox.width, block.bbox.height
                );
            }
        }
    }
    Ok(())
}

/// Merges entries of another store file into the store.
pub fn import_cache(store: &JsonFileStore, source: &Path) -> Result<(), OCRError> {
    let summary = store.import(source)?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

/// Writes the store to another file.
pub fn export_cache(store: &JsonFileStore, target: &Path) -> Result<(), OCRError> {
    let count = store.export(target)?;
    println!("Exported {} items to {}", count, target.display());
    Ok(())
}

/// Removes every stored page.
pub fn purge_cache(store: &JsonFileStore) -> Result<(), OCRError> {
    let removed = store.clear()?;
    println!("Cache purged. Removed {} items.", removed);
    Ok(())
}

/// Prints the store location and size.
pub fn cache_stats(store: &JsonFileStore) -> Result<(), OCRError> {
    let stats = serde_json::json!({
        "path": store.path().display().to_string(),
        "items_in_cache": store.len(),
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
