//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the optimizer
//! needs: identify, recompress (JPEG) and repack (PNG). Both write operations
//! replace the file at `params.path` in place.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{RecompressParams, RepackParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("cannot identify image file: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations must leave the original file intact when an operation
/// fails, and must not hold any handle on the file once they return.
pub trait ImageBackend {
    /// Get image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, flatten to RGB, resample if needed and write back as JPEG.
    fn recompress(&self, params: &RecompressParams) -> Result<(), BackendError>;

    /// Decode, resample if needed, expand to RGBA and write back as PNG.
    fn repack(&self, params: &RepackParams) -> Result<(), BackendError>;
}
