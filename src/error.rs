//! Error types for shamir-stego.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shamir-stego operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while embedding or recovering a secret.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Carrier image or block grid too small for the share set.
    #[error("Insufficient capacity: {0}")]
    Capacity(String),

    /// Shares could not be recombined into the original secret.
    #[error("Reconstruction failed: {0}")]
    Reconstruction(String),

    /// A value does not fit into the value channel.
    #[error("{what} of {value} exceeds the value channel range (max {max})")]
    EncodingRange {
        what: &'static str,
        value: usize,
        max: usize,
    },

    /// Missing or invalid key material.
    #[error("Key error: {0}")]
    Key(String),

    /// Key file could not be found.
    #[error("Key file not found: {0}")]
    KeyNotFound(PathBuf),

    /// Encrypted column-count file could not be found.
    #[error("Geometry file not found: {0}")]
    GeometryNotFound(PathBuf),

    /// Threshold or configuration parameters are out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Blocks do not form the requested grid.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Recovery would re-partition the stego image differently than embedding did.
    #[error("Grid not recoverable: embedded {planned_rows} rows, recovery would derive {derived_rows}")]
    UnrecoverableGeometry {
        planned_rows: u32,
        derived_rows: u32,
    },

    /// A block does not carry a readable share.
    #[error("Malformed block: {0}")]
    MalformedBlock(String),

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decryption error (wrong key or corrupted ciphertext).
    #[error("Decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Image decoding or encoding error.
    #[error("Image error: {0}")]
    Image(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<rsa::Error> for Error {
    fn from(e: rsa::Error) -> Self {
        Error::Key(e.to_string())
    }
}
