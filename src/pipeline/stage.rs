//! Staging: write the uploaded bytes to disk under their original name.
//!
//! Bytes go to a temp file in the target directory first and are then
//! renamed onto `<dir>/<name>`. The rename replaces whatever entry had that
//! name, a symlink included, instead of writing through it. An upload whose
//! name matches the output name (ignoring ASCII case, for case-insensitive
//! filesystems) stays under its temp name, so the previous output is not
//! touched until a new PNG replaces it.
//!
//! The staged file is owned by a [`StagedFile`] guard. Dropping the guard
//! removes the file, so early returns never leave the upload behind. The
//! success path calls [`StagedFile::remove`] instead so a failed removal is
//! reported rather than only logged.

use crate::config::is_plain_file_name;
use crate::error::Upload2PngError;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An uploaded file written to disk, removed when the guard goes away.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file now, reporting failure.
    ///
    /// A file that is already gone counts as removed.
    pub fn remove(mut self) -> Result<(), Upload2PngError> {
        self.armed = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed staged file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Upload2PngError::CleanupFailed {
                path: std::mem::take(&mut self.path),
                source: e,
            }),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staged file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staged file {}: {}", self.path.display(), e),
        }
    }
}

/// Write `content` to `dir/name`, replacing any existing entry of that name.
///
/// When `name` equals `output_name` (ignoring ASCII case) the bytes stay in
/// a temp file in `dir` instead, keeping the extension of `name`.
///
/// # Errors
/// - [`Upload2PngError::InvalidFilename`] if `name` is not a plain file name;
///   nothing is written in that case.
/// - [`Upload2PngError::StageFailed`] if the write or rename fails. The temp
///   file is removed.
pub fn stage(
    dir: &Path,
    name: &str,
    content: &[u8],
    output_name: &str,
) -> Result<StagedFile, Upload2PngError> {
    if !is_plain_file_name(name) {
        return Err(Upload2PngError::InvalidFilename {
            name: name.to_string(),
        });
    }

    let target = dir.join(name);
    let stage_err = |source: std::io::Error| Upload2PngError::StageFailed {
        path: target.clone(),
        source,
    };

    let suffix = Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(".upload2png-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(stage_err)?;
    tmp.write_all(content).map_err(stage_err)?;

    let path = if name.eq_ignore_ascii_case(output_name) {
        tmp.into_temp_path().keep().map_err(|e| stage_err(e.error))?
    } else {
        tmp.persist(&target).map_err(|e| stage_err(e.error))?;
        target
    };

    debug!("Staged {} bytes → {}", content.len(), path.display());
    Ok(StagedFile { path, armed: true })
}
