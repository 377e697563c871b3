/// Error types for the art book
///
/// Every failure is recovered at the boundary where it happens:
/// decode failures blank the image area, store failures become a
/// "didn't save" notice. Permission denial is not an error value either:
/// it is `ImageRequest::Denied` plus a notice.
/// A missing record is not an error at all (`fetch_by_id` returns `None`).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtError {
    /// Bytes are not a decodable raster image
    #[error("could not decode image: {0}")]
    Decode(String),

    /// The encoder could not serialize the raster
    #[error("could not encode image: {0}")]
    Encode(String),

    /// Database I/O, corruption or constraint failure
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Filesystem failure around the database file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dimensions {width}x{height} with bound {max}")]
    InvalidDimensions { width: u32, height: u32, max: u32 },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ArtError>;

