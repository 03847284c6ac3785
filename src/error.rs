//! Error types for the upload2png library.
//!
//! Every failure is fatal for the call that hit it, so there is a single
//! error type, [`Upload2PngError`]. Its variants fall into three groups that
//! callers usually want to react to differently:
//!
//! * **Input** — the upload itself is unusable (nothing uploaded, several
//!   files, a filename that is not a plain name).
//! * **Decode** — the bytes are not an image this build can read.
//! * **Filesystem** — staging, writing `image.png`, or removing the staged
//!   original failed.
//!
//! [`Upload2PngError::kind`] exposes that grouping without matching on every
//! variant.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the upload2png library.
#[derive(Debug, Error)]
pub enum Upload2PngError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The upload mapping contains no files.
    #[error("Upload is empty: no file was selected")]
    EmptyUpload,

    /// More than one file was uploaded and the policy rejects that.
    #[error(
        "Upload contains {count} files ({}), expected exactly one.\n\
Upload a single image, or select one with MultiFilePolicy::FirstByName.",
        .names.join(", ")
    )]
    MultipleFiles { count: usize, names: Vec<String> },

    /// The uploaded filename cannot be used as a file name in the target directory.
    #[error("Invalid upload filename {name:?}: must be a plain file name without path components")]
    InvalidFilename { name: String },

    /// A serialised upload value could not be parsed.
    #[error("Invalid upload value: {0}")]
    InvalidUpload(String),

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The uploaded bytes are not a decodable image.
    #[error("'{name}' is not a readable image: {source}")]
    DecodeFailed {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// The decoded image could not be encoded as PNG.
    #[error("Failed to encode PNG '{path}': {source}")]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the uploaded bytes to the staging file.
    #[error("Failed to write uploaded file '{path}': {source}\nCheck the directory exists and is writable.")]
    StageFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or replace the output PNG.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PNG was written but the staged original could not be removed.
    #[error("Converted, but failed to remove staged file '{path}': {source}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of an [`Upload2PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty, ambiguous or malformed upload.
    Input,
    /// Content is not an image, or could not be re-encoded.
    Decode,
    /// Staging, output or cleanup I/O failed.
    Filesystem,
    /// The configuration was rejected.
    Config,
}

impl Upload2PngError {
    /// Which group of failures this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyUpload
            | Self::MultipleFiles { .. }
            | Self::InvalidFilename { .. }
            | Self::InvalidUpload(_) => ErrorKind::Input,
            Self::DecodeFailed { .. } | Self::EncodeFailed { .. } => ErrorKind::Decode,
            Self::StageFailed { .. }
            | Self::OutputWriteFailed { .. }
            | Self::CleanupFailed { .. } => ErrorKind::Filesystem,
            Self::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}
