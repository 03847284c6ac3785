//! Conversion entry points.
//!
//! [`convert`] is the primary API: it takes an [`Upload`] and a
//! [`ConversionConfig`] and runs the whole pipeline. [`convert_in`] is the
//! short form for "default settings, this directory", and [`convert_bytes`]
//! skips building an upload mapping when the caller already has one named
//! buffer.
//!
//! Conversion is synchronous and touches only `config.output_dir`. Two calls
//! sharing a directory and output name must not run at the same time.

use crate::config::ConversionConfig;
use crate::error::Upload2PngError;
use crate::output::ConversionOutput;
use crate::pipeline::{decode, encode, stage};
use crate::upload::{FileInfo, Upload};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert the single file in `upload` to a PNG.
///
/// # Returns
/// A [`ConversionOutput`] describing the written file.
///
/// # Errors
/// - Input: [`Upload2PngError::EmptyUpload`], [`Upload2PngError::MultipleFiles`],
///   [`Upload2PngError::InvalidFilename`]
/// - Decode: [`Upload2PngError::DecodeFailed`], [`Upload2PngError::EncodeFailed`]
/// - Filesystem: [`Upload2PngError::StageFailed`],
///   [`Upload2PngError::OutputWriteFailed`], [`Upload2PngError::CleanupFailed`]
///
/// On every error except `CleanupFailed` the output file is untouched. The
/// staged original is removed on every path.
pub fn convert(
    upload: &Upload,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Upload2PngError> {
    let (name, file) = upload.select(config.multi_file)?;
    convert_file(name, file, config)
}

/// [`convert`] with default settings, writing into `dir`.
///
/// # Example
/// ```rust,no_run
/// use upload2png::{convert_in, Upload};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("cat.jpg")?;
/// let output = convert_in(&Upload::single("cat.jpg", bytes), "lab00")?;
/// println!("{} ({}x{})", output.output_path.display(), output.width, output.height);
/// # Ok(())
/// # }
/// ```
pub fn convert_in(
    upload: &Upload,
    dir: impl AsRef<Path>,
) -> Result<ConversionOutput, Upload2PngError> {
    let config = ConversionConfig::builder().output_dir(dir.as_ref()).build()?;
    convert(upload, &config)
}

/// Convert one named buffer without wrapping it in an [`Upload`].
pub fn convert_bytes(
    name: &str,
    content: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Upload2PngError> {
    convert_file(name, &FileInfo::new(content), config)
}

fn convert_file(
    name: &str,
    file: &FileInfo,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Upload2PngError> {
    let start = Instant::now();
    let output_path = config.output_path();
    info!("Converting '{}' → {}", name, output_path.display());
    if let Some(mime) = file.mime_type() {
        debug!("Declared type for '{}': {}", name, mime);
    }

    // ── Step 1: Stage upload ─────────────────────────────────────────────
    let staged = stage::stage(&config.output_dir, name, &file.content, &config.output_name)?;

    // ── Step 2: Decode ───────────────────────────────────────────────────
    let decoded = decode::decode_file(staged.path(), name)?;
    let image = encode::png_compatible(decoded.image);

    // ── Step 3: Encode PNG ───────────────────────────────────────────────
    let bytes_written = encode::write_png(&image, &output_path)?;

    // ── Step 4: Remove staged original ───────────────────────────────────
    staged.remove()?;

    let output = ConversionOutput {
        output_path,
        source_name: name.to_string(),
        source_format: decoded.format.map(|f| format!("{f:?}")),
        declared_type: file.mime_type().map(str::to_string),
        width: image.width(),
        height: image.height(),
        color_type: format!("{:?}", image.color()),
        bytes_written,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Converted '{}' ({}x{}) → {} in {}ms",
        name,
        output.width,
        output.height,
        output.output_path.display(),
        output.duration_ms
    );

    Ok(output)
}
