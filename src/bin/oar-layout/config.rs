//! Configuration types for the CLI.

use oar_ocr_layout::core::{LayoutConfig, OCRError, ParallelPolicy};
use oar_ocr_layout::utils::image_dimensions;
use std::path::{Path, PathBuf};

/// How merged blocks are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON array of blocks
    Json,
    /// Human-readable listing
    Pretty,
}

/// Resolved options for the `merge` command.
#[derive(Clone, Debug)]
pub struct MergeOptions {
    pub input: PathBuf,
    pub width: u32,
    pub height: u32,
    pub layout: LayoutConfig,
    pub policy: ParallelPolicy,
    pub output: OutputFormat,
}

impl MergeOptions {
    /// Resolves page size and layout configuration from command-line values.
    ///
    /// The page size comes from `--image` when given, otherwise from `--width`/`--height`.
    pub fn resolve(
        input: PathBuf,
        image: Option<&Path>,
        size: (Option<u32>, Option<u32>),
        config_path: Option<&Path>,
        space_separator: bool,
        policy: ParallelPolicy,
        output: OutputFormat,
    ) -> Result<Self, OCRError> {
        let (width, height) = match (image, size) {
            (Some(path), _) => image_dimensions(path)?,
            (None, (Some(w), Some(h))) => (w, h),
            _ => {
                return Err(OCRError::invalid_input(
                    "page size required: pass --image or both --width and --height",
                ));
            }
        };

        let mut layout = match config_path {
            Some(path) => LayoutConfig::from_json_file(path)?,
            None => LayoutConfig::default(),
        };
        if space_separator {
            layout.merge = layout.merge.with_space_separator();
        }

        Ok(Self {
            input,
            width,
            height,
            layout,
            policy,
            output,
        })
    }
}
