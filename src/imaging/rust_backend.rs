//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG) | `image` crate, format sniffed from content |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `jpeg_encoder::Encoder` with optimized Huffman tables |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, best compression + adaptive filter |
//! | In-place replace | `tempfile::NamedTempFile` next to the resolved target, then `persist` |
//!
//! Formats are detected from file content rather than the extension, so a
//! `.jpg` that really holds PNG data still decodes.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{RecompressParams, RepackParams};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a file with its format guessed from the leading bytes.
fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Resample to exactly `width`x`height`, skipping the filter when nothing changes.
fn resample(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    }
}

/// Encode RGB pixels as baseline JPEG with optimized Huffman tables.
fn encode_jpeg(
    writer: &mut dyn Write,
    img: &RgbImage,
    quality: u8,
    optimize: bool,
) -> Result<(), BackendError> {
    let too_large = || {
        BackendError::Encode(format!(
            "JPEG: {}x{} exceeds 65535px",
            img.width(),
            img.height()
        ))
    };
    let width = u16::try_from(img.width()).map_err(|_| too_large())?;
    let height = u16::try_from(img.height()).map_err(|_| too_large())?;

    let mut encoder = jpeg_encoder::Encoder::new(writer, quality);
    encoder.set_optimized_huffman_tables(optimize);
    encoder
        .encode(img.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| BackendError::Encode(format!("JPEG: {}", e)))
}

/// Replace the file at `path` with whatever `encode` writes.
///
/// Symlinks are resolved first so the linked file is rewritten and the link
/// stays a link. The bytes go to a temporary file next to the target which is
/// renamed over it only once encoding succeeded; on error the temporary file
/// is removed and the original is left as it was. The original permissions
/// are carried over.
fn replace_in_place<F>(path: &Path, encode: F) -> Result<(), BackendError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), BackendError>,
{
    let target = std::fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or(Path::new("/"));
    let permissions = std::fs::metadata(&target)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(&target).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(Dimensions { width, height })
    }

    fn recompress(&self, params: &RecompressParams) -> Result<(), BackendError> {
        // Flatten first: JPEG has no alpha, and metadata is not carried over.
        let rgb = DynamicImage::ImageRgb8(load_image(&params.path)?.into_rgb8());
        let resized = resample(rgb, params.width, params.height).into_rgb8();
        let quality = params.quality.value() as u8;

        replace_in_place(&params.path, |writer| encode_jpeg(writer, &resized, quality, true))
    }

    fn repack(&self, params: &RepackParams) -> Result<(), BackendError> {
        let img = load_image(&params.path)?;
        let resized = resample(img, params.width, params.height);
        let rgba = DynamicImage::ImageRgba8(resized.into_rgba8());

        replace_in_place(&params.path, |writer| {
            let encoder =
                PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
            rgba.write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(format!("PNG: {}", e)))
        })
    }
}
