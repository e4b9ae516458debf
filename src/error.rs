//! Error types for coordkit

use std::io;
use thiserror::Error;

/// Result type for coordkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in coordkit operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed raster file
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Invalid TIFF magic number
    #[error("Invalid TIFF magic number: {0}")]
    InvalidMagic(u16),

    /// Missing required tag
    #[error("Missing required tag: {0}")]
    MissingTag(u16),

    /// Unsupported feature
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Out of bounds access
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Coordinate transformation failed
    #[error("Projection error: {0}")]
    Projection(String),

    /// Authority identifier that cannot name a reference system
    #[error("Invalid reference system: {0:?}")]
    InvalidReferenceSystem(String),

    /// Settings file could not be decoded
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// CSV input or output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
