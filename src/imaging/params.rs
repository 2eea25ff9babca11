//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides the target size) and the [`backend`](super::backend)
//! (which does the pixel work and the write). This separation allows swapping
//! backends (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`RecompressParams`]: Rewrite a file in place as opaque RGB JPEG.
//! - [`RepackParams`]: Rewrite a file in place as RGBA PNG.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Parameters for an in-place JPEG recompression.
///
/// `width`/`height` are the final dimensions; when they equal the source
/// dimensions the pixels are re-encoded without resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct RecompressParams {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Parameters for an in-place PNG repack (lossless, best compression).
#[derive(Debug, Clone, PartialEq)]
pub struct RepackParams {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}
