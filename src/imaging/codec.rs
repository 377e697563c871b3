//! Raster <-> bytes serialization for stored artwork images.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::DynamicImage;
use serde::Deserialize;

use crate::error::{ArtError, Result};

/// Format of the bytes written to the `image` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredFormat {
    /// Lossless; quality only picks the compression effort
    #[default]
    Png,
    /// Lossy; alpha is dropped
    Jpeg,
}

/// Encode `image` into `format` at `quality` (0-100).
pub fn encode(image: &DynamicImage, format: StoredFormat, quality: u8) -> Result<Vec<u8>> {
    let quality = quality.min(100);
    let mut bytes = Vec::new();

    match format {
        StoredFormat::Png => {
            let compression = match quality {
                0..=33 => CompressionType::Best,
                34..=66 => CompressionType::Default,
                _ => CompressionType::Fast,
            };
            let encoder = PngEncoder::new_with_quality(&mut bytes, compression, PngFilter::Adaptive);
            image
                .write_with_encoder(encoder)
                .map_err(|e| ArtError::Encode(e.to_string()))?;
        }
        StoredFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.max(1));
            rgb.write_with_encoder(encoder)
                .map_err(|e| ArtError::Encode(e.to_string()))?;
        }
    }

    Ok(bytes)
}

/// Decode stored bytes back into a raster. The format is guessed from the header.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ArtError::Decode("empty payload".to_string()));
    }

    image::load_from_memory(bytes).map_err(|e| ArtError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_png_keeps_dimensions_and_pixels() {
        let img = gradient(300, 240);
        let bytes = encode(&img, StoredFormat::Png, 50).unwrap();

        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let back = decode(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (300, 240));
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let img = gradient(240, 300);
        let bytes = encode(&img, StoredFormat::Jpeg, 50).unwrap();

        assert!(bytes.starts_with(&[0xFF, 0xD8]));

        let back = decode(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (240, 300));
    }

    #[test]
    fn test_lower_jpeg_quality_is_smaller() {
        let img = gradient(200, 200);
        let low = encode(&img, StoredFormat::Jpeg, 10).unwrap();
        let high = encode(&img, StoredFormat::Jpeg, 95).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(decode(&[]), Err(ArtError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let garbage: Vec<u8> = (0..512u32).map(|i| (i * 37 % 251) as u8).collect();
        assert!(matches!(decode(&garbage), Err(ArtError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let bytes = encode(&gradient(64, 64), StoredFormat::Png, 50).unwrap();
        let truncated = &bytes[..bytes.len() / 3];
        assert!(matches!(decode(truncated), Err(ArtError::Decode(_))));
    }
}
