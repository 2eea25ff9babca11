//! High-level image operations.
//!
//! These functions combine calculations with backend execution: identify the
//! source, fit it to the configured threshold, then let the backend rewrite
//! the file.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within;
use super::params::{RecompressParams, RepackParams};
use crate::config::OptimizeConfig;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Plan a gallery recompression without executing it.
pub fn plan_jpeg(path: &Path, original: (u32, u32), config: &OptimizeConfig) -> RecompressParams {
    let (width, height) = fit_within(original, config.gallery_max);
    RecompressParams {
        path: path.to_path_buf(),
        width,
        height,
        quality: config.jpeg_quality,
    }
}

/// Resize a gallery image to `gallery_max` and recompress it as JPEG, in place.
///
/// Returns the final dimensions.
pub fn optimize_jpeg(
    backend: &impl ImageBackend,
    path: &Path,
    config: &OptimizeConfig,
) -> Result<(u32, u32)> {
    let original = get_dimensions(backend, path)?;
    let params = plan_jpeg(path, original, config);
    backend.recompress(&params)?;
    Ok((params.width, params.height))
}

/// Resize the hero banner to `hero_max_width` and repack it as RGBA PNG, in place.
///
/// The filename is kept even if it says `.jpg`, so existing links keep
/// working. The batch run never calls this: hero files are skipped.
pub fn optimize_hero(
    backend: &impl ImageBackend,
    path: &Path,
    config: &OptimizeConfig,
) -> Result<(u32, u32)> {
    let original = get_dimensions(backend, path)?;
    let (width, height) = fit_within(original, config.hero_max_width);
    backend.repack(&RepackParams {
        path: path.to_path_buf(),
        width,
        height,
    })?;
    Ok((width, height))
}
