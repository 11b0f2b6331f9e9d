//! Utility functions for image inspection and slicing.

use crate::core::OCRError;
use crate::pipeline::chunking::Chunk;
use image::RgbImage;

/// Reads only the pixel dimensions of an image file.
pub fn image_dimensions(path: &std::path::Path) -> Result<(u32, u32), OCRError> {
    image::image_dimensions(path).map_err(OCRError::ImageLoad)
}

/// Copies the rows of one band out of a page image.
///
/// The band is clipped to the image, so a band reaching past the bottom yields
/// a shorter image.
pub fn crop_band(image: &RgbImage, band: &Chunk) -> Result<RgbImage, OCRError> {
    let (width, height) = image.dimensions();
    if band.pixel_top >= height || band.pixel_bottom <= band.pixel_top {
        return Err(OCRError::invalid_input(format!(
            "band {}..{} lies outside an image of height {}",
            band.pixel_top, band.pixel_bottom, height
        )));
    }
    let bottom = band.pixel_bottom.min(height);
    Ok(image::imageops::crop_imm(image, 0, band.pixel_top, width, bottom - band.pixel_top).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TilingConfig;
    use crate::pipeline::chunking::ChunkPlanner;
    use image::Rgb;

    #[test]
    fn test_crop_band_takes_rows() {
        let mut img = RgbImage::new(4, 3000);
        img.put_pixel(0, 1600, Rgb([255, 0, 0]));

        let planner = ChunkPlanner::new(TilingConfig::default());
        let bands = planner.plan_recognition_bands(4, 3000);
        let second = crop_band(&img, &bands[1]).unwrap();
        assert_eq!(second.dimensions(), (4, 1500));
        assert_eq!(second.get_pixel(0, 100), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_crop_band_outside_image() {
        let img = RgbImage::new(4, 10);
        let planner = ChunkPlanner::new(TilingConfig::default());
        let band = planner.plan_recognition_bands(4, 5000)[2];
        assert!(crop_band(&img, &band).is_err());
    }
}
