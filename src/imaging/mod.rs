//! Image processing in pure Rust, no external tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Recompress → JPEG** | Lanczos3 + `jpeg_encoder` (optimized Huffman tables) |
//! | **Repack → PNG** | Lanczos3 + `PngEncoder` (best compression) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{get_dimensions, optimize_hero, optimize_jpeg};
pub use params::{Quality, RecompressParams, RepackParams};
pub use rust_backend::RustBackend;
