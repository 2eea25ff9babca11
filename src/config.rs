//! Optimizer configuration.
//!
//! Every knob of a run lives in [`OptimizeConfig`]. The tool itself takes no
//! flags and reads no config file: `main` always uses
//! [`OptimizeConfig::default`], whose values are the constants below. Tests
//! build their own configs to shrink thresholds or point at a temp dir.
//!
//! ## Defaults
//!
//! ```text
//! image_dir      = "img"
//! gallery_max    = 900    # longest side; gallery displays at 300px height
//! hero_max_width = 1200   # only used by the (unwired) hero repack
//! jpeg_quality   = 85
//! hero_names     = ["hero-bread.png", "hero-bread.jpg"]
//! ```

use crate::imaging::Quality;
use std::path::PathBuf;
use thiserror::Error;

/// Longest side allowed for gallery images, in pixels.
pub const GALLERY_MAX: u32 = 900;
/// Longest side allowed for the hero banner, in pixels.
pub const HERO_MAX_WIDTH: u32 = 1200;
/// JPEG encoder quality for recompressed gallery images.
pub const JPEG_QUALITY: u32 = 85;
/// Filenames (lower-case) of the hero banner, which is never touched.
pub const HERO_NAMES: &[&str] = &["hero-bread.png", "hero-bread.jpg"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for a single optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeConfig {
    /// Directory whose files are rewritten in place.
    pub image_dir: PathBuf,
    /// Gallery images are downscaled so their longest side fits this.
    pub gallery_max: u32,
    /// Longest side for the hero repack.
    pub hero_max_width: u32,
    /// Quality used when re-encoding JPEGs.
    pub jpeg_quality: Quality,
    /// Lower-case filenames that are always skipped.
    pub hero_names: Vec<String>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("img"),
            gallery_max: GALLERY_MAX,
            hero_max_width: HERO_MAX_WIDTH,
            jpeg_quality: Quality::new(JPEG_QUALITY),
            hero_names: HERO_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl OptimizeConfig {
    /// Default configuration rooted at a different image directory.
    pub fn for_dir(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            ..Self::default()
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery_max == 0 {
            return Err(ConfigError::Validation(
                "gallery_max must be greater than 0".into(),
            ));
        }
        if self.hero_max_width == 0 {
            return Err(ConfigError::Validation(
                "hero_max_width must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality.value()) {
            return Err(ConfigError::Validation(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality.value()
            )));
        }
        if self.hero_names.iter().any(|n| n.to_lowercase() != *n) {
            return Err(ConfigError::Validation(
                "hero_names must be lower-case".into(),
            ));
        }
        Ok(())
    }
}
