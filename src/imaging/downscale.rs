//! Proportional downscaling bounded by a maximum dimension.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::{ArtError, Result};

/// Calculate the stored dimensions for an image of `width` x `height`.
///
/// Landscape images (`width > height`) get `width = max`; everything else,
/// squares included, takes the portrait branch and gets `height = max`.
/// The other edge is rounded and never drops below one pixel.
///
/// # Examples
/// ```ignore
/// assert_eq!(target_dimensions(500, 400, 300)?, (300, 240));
/// assert_eq!(target_dimensions(400, 500, 300)?, (240, 300));
/// ```
pub fn target_dimensions(width: u32, height: u32, max: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 || max == 0 {
        return Err(ArtError::InvalidDimensions { width, height, max });
    }

    let ratio = width as f64 / height as f64;

    if ratio > 1.0 {
        // Landscape
        let h = (max as f64 / ratio).round() as u32;
        Ok((max, h.max(1)))
    } else {
        // Portrait or square
        let w = (max as f64 * ratio).round() as u32;
        Ok((w.max(1), max))
    }
}

/// Resize `image` so its bounding edge equals `max`, keeping the aspect ratio.
///
/// Uses bilinear filtering. The input image is left untouched.
pub fn downscale(image: &DynamicImage, max: u32) -> Result<DynamicImage> {
    let (width, height) = target_dimensions(image.width(), image.height(), max)?;
    Ok(image.resize_exact(width, height, FilterType::Triangle))
}
