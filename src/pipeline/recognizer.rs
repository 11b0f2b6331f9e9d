//! The seam to external text recognizers.

use crate::core::errors::OCRError;
use crate::domain::RawLine;
use image::RgbImage;
use std::sync::Arc;

/// A text recognizer: given an RGB image, returns the lines it detected.
///
/// Coordinates of the returned lines are pixels of the image passed in. Implementations
/// are selected at startup and shared between threads; a call may block.
pub trait Recognizer: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Recognizes one image.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying engine, usually wrapped with
    /// [`OCRError::recognition_error`].
    fn recognize(&self, image: &RgbImage) -> Result<Vec<RawLine>, OCRError>;
}

/// A recognizer shared between a pipeline and its callers.
pub type SharedRecognizer = Arc<dyn Recognizer>;

impl<R: Recognizer + ?Sized> Recognizer for Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &RgbImage) -> Result<Vec<RawLine>, OCRError> {
        (**self).recognize(image)
    }
}
