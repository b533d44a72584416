//! Error types for the map renderer

use thiserror::Error;

/// Map rendering error types
#[derive(Debug, Error)]
pub enum MapError {
    /// Base map of a zone could not be decoded
    #[error("Cannot decode map of zone '{zone}': {source}")]
    Decode {
        zone: String,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing an output image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Font for names on the map could not be loaded
    #[error("Invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// IO error while preparing the output directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for map operations
pub type MapResult<T> = Result<T, MapError>;
