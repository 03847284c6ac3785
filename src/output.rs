//! Result of a successful conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a conversion produced.
///
/// Serialisable so the CLI can print it with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the PNG was written.
    pub output_path: PathBuf,
    /// Filename of the upload that was converted.
    pub source_name: String,
    /// Detected source format, e.g. `"Jpeg"`. `None` if the decoder did not say.
    pub source_format: Option<String>,
    /// MIME type the browser declared for the upload, if any.
    pub declared_type: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Colour type of the written PNG, e.g. `"Rgba8"`.
    pub color_type: String,
    /// Size of the PNG on disk.
    pub bytes_written: u64,
    /// Wall-clock time for the whole conversion.
    pub duration_ms: u64,
}
