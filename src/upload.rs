//! The upload record: what a file-upload widget hands over.
//!
//! A widget reports its value as a mapping from the original filename to a
//! record holding the raw bytes plus whatever metadata the browser supplied:
//!
//! ```json
//! {
//!   "cat.jpg": {
//!     "metadata": { "name": "cat.jpg", "type": "image/jpeg", "size": 5120, "lastModified": 1700000000000 },
//!     "content": "<base64>"
//!   }
//! }
//! ```
//!
//! [`Upload`] keeps entries ordered by filename, so whichever file is picked
//! from a multi-file upload does not depend on hash or insertion order.

use crate::config::MultiFilePolicy;
use crate::error::Upload2PngError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Browser-supplied metadata for one uploaded file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type as reported by the browser, e.g. `image/jpeg`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

/// One uploaded file's content and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
    /// Raw file bytes (base64 in JSON).
    #[serde(with = "base64_bytes")]
    pub content: Vec<u8>,
}

impl FileInfo {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            metadata: None,
            content: content.into(),
        }
    }

    pub fn with_metadata(mut self, metadata: FileMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// MIME type the browser declared, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.metadata.as_ref()?.mime_type.as_deref()
    }
}

/// A widget upload value: filename → file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Upload {
    files: BTreeMap<String, FileInfo>,
}

impl Upload {
    pub fn new() -> Self {
        Self::default()
    }

    /// An upload holding exactly one file.
    pub fn single(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let mut upload = Self::new();
        upload.insert(name, FileInfo::new(content));
        upload
    }

    /// Add a file, replacing any earlier file with the same name.
    pub fn insert(&mut self, name: impl Into<String>, file: FileInfo) -> Option<FileInfo> {
        self.files.insert(name.into(), file)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Filenames in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&FileInfo> {
        self.files.get(name)
    }

    /// Parse a widget value serialised as JSON.
    pub fn from_json(json: &str) -> Result<Self, Upload2PngError> {
        serde_json::from_str(json).map_err(|e| Upload2PngError::InvalidUpload(e.to_string()))
    }

    /// Build an upload from files on disk, keyed by their file names.
    ///
    /// Stands in for the widget when the bytes already live on disk. Two paths
    /// with the same file name are an [`Upload2PngError::InvalidUpload`]
    /// error, since one would otherwise replace the other.
    pub fn from_paths<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self, Upload2PngError> {
        let mut upload = Self::new();
        for path in paths {
            let path = path.as_ref();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Upload2PngError::InvalidFilename {
                    name: path.display().to_string(),
                })?
                .to_string();
            let content = std::fs::read(path).map_err(|e| {
                Upload2PngError::InvalidUpload(format!("cannot read '{}': {e}", path.display()))
            })?;
            let metadata = FileMetadata {
                name: Some(name.clone()),
                size: Some(content.len() as u64),
                ..FileMetadata::default()
            };
            let file = FileInfo::new(content).with_metadata(metadata);
            if upload.insert(name.clone(), file).is_some() {
                return Err(Upload2PngError::InvalidUpload(format!(
                    "duplicate file name '{name}' (second occurrence: '{}')",
                    path.display()
                )));
            }
        }
        Ok(upload)
    }

    /// Pick the one file a conversion will process.
    ///
    /// # Errors
    /// - [`Upload2PngError::EmptyUpload`] when nothing was uploaded.
    /// - [`Upload2PngError::MultipleFiles`] when several files were uploaded
    ///   and `policy` is [`MultiFilePolicy::Reject`].
    pub fn select(&self, policy: MultiFilePolicy) -> Result<(&str, &FileInfo), Upload2PngError> {
        let mut entries = self.files.iter();
        let (name, file) = entries.next().ok_or(Upload2PngError::EmptyUpload)?;

        if self.files.len() > 1 {
            match policy {
                MultiFilePolicy::Reject => {
                    return Err(Upload2PngError::MultipleFiles {
                        count: self.files.len(),
                        names: self.files.keys().cloned().collect(),
                    });
                }
                MultiFilePolicy::FirstByName => {
                    warn!(
                        "Upload has {} files; converting '{}' and ignoring the rest",
                        self.files.len(),
                        name
                    );
                }
            }
        }

        Ok((name.as_str(), file))
    }
}

impl<N: Into<String>> FromIterator<(N, FileInfo)> for Upload {
    fn from_iter<I: IntoIterator<Item = (N, FileInfo)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(|(n, f)| (n.into(), f)).collect(),
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD.decode(encoded.trim()).map_err(serde::de::Error::custom)
    }
}
