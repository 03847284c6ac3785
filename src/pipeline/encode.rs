//! PNG encoding: `DynamicImage` → PNG file, written atomically.
//!
//! The PNG is encoded in memory, written to a temp file in the output
//! directory and renamed over the target. Readers of `image.png` therefore
//! see either the previous image or the new one, never a half-written file,
//! and a failed encode leaves the previous file in place.

use crate::error::Upload2PngError;
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Convert colour types the PNG encoder rejects into ones it accepts.
///
/// PNG has no floating-point samples; 32-bit float images (TIFF can produce
/// them) become 16-bit per channel. Everything else passes through unchanged.
pub fn png_compatible(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}

/// Encode `image` as PNG and atomically replace `path` with it.
///
/// Returns the number of bytes written.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<u64, Upload2PngError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Upload2PngError::EncodeFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let write_err = |source: std::io::Error| Upload2PngError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".upload2png-")
        .suffix(".png.tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tmp.write_all(&buf).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes PNG → {}", buf.len(), path.display());
    Ok(buf.len() as u64)
}
