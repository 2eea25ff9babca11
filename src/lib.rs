//! # img-optimize
//!
//! Shrinks the images of a static site for web delivery, in place. Run from
//! the project root, it rewrites every JPEG in `img/` so that its longest side
//! is at most 900px and re-encodes it at quality 85. The hero banner
//! (`hero-bread.png` / `hero-bread.jpg`) and every other file are left
//! byte-for-byte alone.
//!
//! ```text
//! img/
//! ├── hero-bread.png    skipped by name
//! ├── photo1.JPG        2000x1000 → 900x450, JPEG q85
//! ├── photo2.jpeg       640x480 → recompressed at the same size
//! └── logo.svg          ignored
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | [`OptimizeConfig`](config::OptimizeConfig): thresholds, quality, hero names, target dir |
//! | [`policy`] | Filename → action classification |
//! | [`imaging`] | Dimension math, the `ImageBackend` trait, the `image`-crate backend, JPEG/hero transforms |
//! | [`optimize`] | Batch run: directory walk, per-file outcomes, running totals |
//! | [`output`] | Console line formatting |
//!
//! # Design Decisions
//!
//! ## Outcomes Are Values
//!
//! Every attempted file yields a [`FileOutcome`](optimize::FileOutcome),
//! either `Optimized` or `Failed`. The batch loop folds those into a
//! [`RunSummary`](optimize::RunSummary) instead of letting errors unwind, so
//! one corrupt file can never stop the run and the behaviour is testable
//! without a terminal.
//!
//! ## Replace, Don't Truncate
//!
//! Re-encoded bytes go to a temporary file in the same directory and are
//! renamed over the original only after the encoder finished. A failed encode
//! leaves the original file exactly as it was.
//!
//! ## The Hero Repack Is Not Wired In
//!
//! [`imaging::optimize_hero`] (resize to 1200px, repack as RGBA PNG) exists
//! and is tested, but the batch run skips hero files by name: hero images are
//! often JPEG data in a `.png` file and repacking them as real PNG tends to
//! make them larger.

pub mod config;
pub mod imaging;
pub mod optimize;
pub mod output;
pub mod policy;

#[cfg(test)]
pub(crate) mod test_helpers;
