//! Configuration types for upload-to-PNG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The target directory is an explicit
//! field rather than the process working directory, so two callers that need
//! isolation only have to point at different directories.

use crate::error::Upload2PngError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name written when no other name is configured.
pub const DEFAULT_OUTPUT_NAME: &str = "image.png";

/// Configuration for a single conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use upload2png::{ConversionConfig, MultiFilePolicy};
///
/// let config = ConversionConfig::builder()
///     .output_dir("/tmp/lab00")
///     .multi_file(MultiFilePolicy::Reject)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_path(), std::path::Path::new("/tmp/lab00/image.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Directory that receives both the staged upload and the PNG. Default: `.`.
    pub output_dir: PathBuf,

    /// Name of the PNG written into `output_dir`. Default: `image.png`.
    ///
    /// Any existing file with this name is replaced.
    pub output_name: String,

    /// What to do when the upload holds more than one file. Default: reject.
    pub multi_file: MultiFilePolicy,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            multi_file: MultiFilePolicy::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full path of the PNG this configuration produces.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = name.into();
        self
    }

    pub fn multi_file(mut self, policy: MultiFilePolicy) -> Self {
        self.config.multi_file = policy;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Upload2PngError> {
        let c = &self.config;
        if c.output_dir.as_os_str().is_empty() {
            return Err(Upload2PngError::InvalidConfig(
                "output directory must not be empty".into(),
            ));
        }
        if !is_plain_file_name(&c.output_name) {
            return Err(Upload2PngError::InvalidConfig(format!(
                "output name must be a plain file name, got {:?}",
                c.output_name
            )));
        }
        let is_png = Path::new(&c.output_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(Upload2PngError::InvalidConfig(format!(
                "output name must end in .png, got {:?}",
                c.output_name
            )));
        }
        Ok(self.config)
    }
}

/// Whether `name` names a file directly inside a directory: non-empty, no
/// separators, not `.` or `..`.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Policy for uploads that carry more than one file.
///
/// The widget allows multi-select, but a conversion produces exactly one PNG,
/// so one of the files has to win or the call has to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MultiFilePolicy {
    /// Fail with [`Upload2PngError::MultipleFiles`]. (default)
    #[default]
    Reject,
    /// Convert the file whose name sorts first; the others are ignored.
    FirstByName,
}
