//! Which files get optimized.
//!
//! Classification works on the file name alone, lower-cased:
//!
//! ```text
//! hero-bread.png / hero-bread.jpg  → Skip(Hero)
//! *.jpg / *.jpeg                   → RecompressJpeg
//! anything else                    → Skip(Unsupported)
//! ```
//!
//! The hero check runs first, so a hero saved as `.jpg` is never recompressed.

use crate::config::OptimizeConfig;

/// Why a file is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The hero banner, excluded by name.
    Hero,
    /// Not a JPEG by extension.
    Unsupported,
}

/// What to do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RecompressJpeg,
    Skip(SkipReason),
}

const JPEG_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Classify a file by name.
pub fn classify(file_name: &str, config: &OptimizeConfig) -> Action {
    let low = file_name.to_lowercase();

    if config.hero_names.iter().any(|hero| *hero == low) {
        Action::Skip(SkipReason::Hero)
    } else if JPEG_SUFFIXES.iter().any(|suffix| low.ends_with(suffix)) {
        Action::RecompressJpeg
    } else {
        Action::Skip(SkipReason::Unsupported)
    }
}
