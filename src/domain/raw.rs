//! The line schema produced by external recognizers.
//!
//! A recognizer reports lines in pixel coordinates of the image it was given.
//! Nothing here is validated; [`crate::domain::LineRecord::from_raw`] decides
//! which lines are usable.

use crate::core::constants::DEFAULT_WORD_CONFIDENCE;
use crate::processors::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// One recognized word. Only its confidence is consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl RawWord {
    pub fn new(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// One line as reported by a recognizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    #[serde(default)]
    pub text: String,
    /// Corner points in pixels, possibly rotated. Absent when the engine gave no geometry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<BoundingBox>,
    #[serde(default)]
    pub words: Vec<RawWord>,
}

/// Normalized center/size geometry, as reported by engines that do not emit polygons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl RawLine {
    pub fn new(text: impl Into<String>, polygon: BoundingBox, words: Vec<RawWord>) -> Self {
        Self {
            text: text.into(),
            polygon: Some(polygon),
            words,
        }
    }

    /// Builds a line from normalized center geometry on an image of the given pixel size.
    ///
    /// Such engines report no words, so the line carries a single word holding the
    /// whole text with the given confidence.
    pub fn from_center_geometry(
        text: impl Into<String>,
        geometry: CenterGeometry,
        image_width: u32,
        image_height: u32,
        confidence: f32,
    ) -> Self {
        let text = text.into();
        let (w, h) = (image_width as f32, image_height as f32);
        let x1 = (geometry.center_x - geometry.width / 2.0) * w;
        let y1 = (geometry.center_y - geometry.height / 2.0) * h;
        let x2 = x1 + geometry.width * w;
        let y2 = y1 + geometry.height * h;
        Self {
            words: vec![RawWord::new(text.clone(), Some(confidence))],
            text,
            polygon: Some(BoundingBox::from_coords(x1, y1, x2, y2)),
        }
    }

    /// Average word confidence; words without one count as [`DEFAULT_WORD_CONFIDENCE`].
    pub fn average_confidence(&self) -> f32 {
        if self.words.is_empty() {
            return DEFAULT_WORD_CONFIDENCE;
        }
        let total: f32 = self
            .words
            .iter()
            .map(|w| w.confidence.unwrap_or(DEFAULT_WORD_CONFIDENCE))
            .sum();
        total / self.words.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_confidence_defaults_missing_values() {
        let line = RawLine::new(
            "abc",
            BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0),
            vec![RawWord::new("a", Some(0.75)), RawWord::new("bc", None)],
        );
        assert!((line.average_confidence() - 0.85).abs() < 1e-6);

        let wordless = RawLine {
            text: "x".to_string(),
            ..Default::default()
        };
        assert_eq!(wordless.average_confidence(), DEFAULT_WORD_CONFIDENCE);
    }

    #[test]
    fn test_from_center_geometry_to_pixels() {
        let geometry = CenterGeometry {
            center_x: 0.5,
            center_y: 0.25,
            width: 0.2,
            height: 0.1,
        };
        let line = RawLine::from_center_geometry("hi", geometry, 1000, 2000, 0.98);
        let polygon = line.polygon.as_ref().unwrap();
        assert!((polygon.x_min() - 400.0).abs() < 1e-3);
        assert!((polygon.x_max() - 600.0).abs() < 1e-3);
        assert!((polygon.y_min() - 400.0).abs() < 1e-3);
        assert!((polygon.y_max() - 600.0).abs() < 1e-3);
        assert_eq!(line.words.len(), 1);
        assert_eq!(line.average_confidence(), 0.98);
    }

    #[test]
    fn test_deserialize_minimal_line() {
        let line: RawLine = serde_json::from_str(r#"{ "text": "only text" }"#).unwrap();
        assert!(line.polygon.is_none());
        assert!(line.words.is_empty());
    }
}
