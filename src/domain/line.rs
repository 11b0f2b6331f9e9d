//! Normalized line geometry and the line record consumed by clustering.

use super::raw::RawLine;
use crate::core::constants::WORKING_SCALE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing normalized coordinates for containment.
const CONTAINMENT_EPSILON: f32 = 1e-6;

/// An axis-aligned rectangle in page-normalized coordinates, `x`/`y` at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormalizedBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a box from its top-left and bottom-right corners.
    pub fn from_corners(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The smallest box enclosing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        self.x <= other.x + CONTAINMENT_EPSILON
            && self.y <= other.y + CONTAINMENT_EPSILON
            && self.right() + CONTAINMENT_EPSILON >= other.right()
            && self.bottom() + CONTAINMENT_EPSILON >= other.bottom()
    }

    /// Every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// The reading direction of a line or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Top-to-bottom columns read right-to-left.
    Vertical,
    /// Left-to-right rows read top-to-bottom.
    Horizontal,
}

impl Orientation {
    /// A box is vertical when it is no wider than it is tall.
    pub fn of_box(bbox: &NormalizedBox) -> Self {
        if bbox.width <= bbox.height {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// One detected line of text, normalized to the full page.
///
/// Orientation is derived once from the box when the record is created. Records are
/// never mutated; remapping a band-local record produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    text: String,
    bbox: NormalizedBox,
    orientation: Orientation,
    confidence: f32,
}

impl LineRecord {
    /// Creates a record from already trimmed text and a normalized box.
    pub fn new(text: impl Into<String>, bbox: NormalizedBox, confidence: f32) -> Self {
        Self {
            text: text.into(),
            orientation: Orientation::of_box(&bbox),
            bbox,
            confidence,
        }
    }

    /// Normalizes a recognizer line against the image it was recognized on.
    ///
    /// Returns `None` for lines with blank text, no usable geometry or no words,
    /// and for zero-sized images.
    pub fn from_raw(raw: &RawLine, image_width: u32, image_height: u32) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }
        let text = raw.text.trim();
        if text.is_empty() || raw.words.is_empty() {
            return None;
        }
        let polygon = raw.polygon.as_ref().filter(|p| p.is_usable())?;

        let (w, h) = (image_width as f32, image_height as f32);
        let bbox = NormalizedBox::from_corners(
            polygon.x_min() / w,
            polygon.y_min() / h,
            polygon.x_max() / w,
            polygon.y_max() / h,
        );
        Some(Self::new(text, bbox, raw.average_confidence()))
    }

    /// Returns a record with the same text and confidence over a different box.
    pub fn with_box(&self, bbox: NormalizedBox) -> Self {
        Self::new(self.text.clone(), bbox, self.confidence)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bbox(&self) -> &NormalizedBox {
        &self.bbox
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Glyph size proxy in working scale: width for vertical lines, height for horizontal ones.
    pub fn font_metric(&self) -> f32 {
        let extent = match self.orientation {
            Orientation::Vertical => self.bbox.width,
            Orientation::Horizontal => self.bbox.height,
        };
        extent * WORKING_SCALE
    }

    /// Box in working scale.
    pub fn working_box(&self) -> NormalizedBox {
        self.bbox.scaled(WORKING_SCALE)
    }
}
