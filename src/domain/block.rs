//! Reconstructed text blocks, the output of the layout pipeline.

use super::line::{LineRecord, NormalizedBox, Orientation};
use serde::{Deserialize, Serialize};

/// One logical text unit built from one or more detected lines.
///
/// Serializes as `{text, tightBoundingBox, isMerged?, forcedOrientation?, confidence?}`.
/// A single-line block is a passthrough of its line and carries no merge metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub text: String,
    #[serde(rename = "tightBoundingBox")]
    pub bbox: NormalizedBox,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_merged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced_orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Block {
    /// Emits a line unchanged as its own block.
    pub fn passthrough(line: &LineRecord) -> Self {
        Self {
            text: line.text().to_string(),
            bbox: *line.bbox(),
            is_merged: false,
            forced_orientation: None,
            confidence: Some(line.confidence()),
        }
    }

    /// A block built from two or more lines.
    pub fn merged(text: String, bbox: NormalizedBox, orientation: Orientation) -> Self {
        Self {
            text,
            bbox,
            is_merged: true,
            forced_orientation: Some(orientation),
            confidence: None,
        }
    }

    /// The forced orientation of a merged block, otherwise the one implied by its box.
    pub fn orientation(&self) -> Orientation {
        self.forced_orientation
            .unwrap_or_else(|| Orientation::of_box(&self.bbox))
    }
}
