/// Image normalization module
///
/// This module handles:
/// - Proportional downscaling bounded by a maximum dimension (downscale.rs)
/// - Encoding rasters to stored bytes and decoding them back (codec.rs)

pub mod codec;
pub mod downscale;

pub use codec::{decode, encode, StoredFormat};
pub use downscale::downscale;

/// Bound used for stored artwork images
pub const MAX_DIMENSION: u32 = 300;

/// Quality parameter used when encoding stored artwork images
pub const ENCODE_QUALITY: u8 = 50;
