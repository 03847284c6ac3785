//! # upload2png
//!
//! Turn whatever image a user dropped into a file-upload widget into a PNG
//! with a fixed, predictable name.
//!
//! A notebook exercise that says "open `image.png`" needs that file to exist
//! regardless of whether the student uploaded `cat.jpeg`, `scan.bmp` or
//! `photo.webp`. This crate takes the widget's value (a mapping from the
//! uploaded filename to its bytes), decodes the image whatever its format, and
//! writes it back out as `image.png`, removing the uploaded original.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Upload
//!  │
//!  ├─ 1. Select  exactly one file (empty / multi-file uploads are errors)
//!  ├─ 2. Stage   write bytes to <dir>/<original name>
//!  ├─ 3. Decode  sniff format from content, decode pixels
//!  ├─ 4. Encode  PNG via temp file + rename → <dir>/image.png
//!  └─ 5. Clean   remove the staged original (guaranteed on every path)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upload2png::{convert, ConversionConfig, Upload};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let upload = Upload::single("cat.jpg", std::fs::read("cat.jpg")?);
//!     let config = ConversionConfig::builder().output_dir("lab00").build()?;
//!     let output = convert(&upload, &config)?;
//!     eprintln!("wrote {} ({} bytes)", output.output_path.display(), output.bytes_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `upload2png` binary (clap + anyhow + tracing-subscriber) |
//!
//! ## Supported input formats
//!
//! PNG, JPEG, GIF (first frame), BMP, WebP, TIFF and ICO.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, MultiFilePolicy, DEFAULT_OUTPUT_NAME};
pub use convert::{convert, convert_bytes, convert_in};
pub use error::{ErrorKind, Upload2PngError};
pub use output::ConversionOutput;
pub use upload::{FileInfo, FileMetadata, Upload};
