//! Request-scoped scratch directories.
//!
//! Each conversion request gets its own [`Scratch`] directory holding the
//! uploaded input and the derived output. The directory is removed when the
//! `Scratch` is dropped, so no artifact outlives its request.

use crate::transcode::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory owning the artifacts of one conversion request.
pub struct Scratch {
    temp_dir: TempDir,
}

impl Scratch {
    /// Create a fresh scratch directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path for the uploaded artifact.
    ///
    /// The uploaded name is stripped to its final path component, so a
    /// traversal attempt like `../../etc/passwd` lands inside the scratch
    /// directory as `passwd`.
    pub fn input_path(&self, uploaded_name: &str) -> Result<PathBuf> {
        let name = Path::new(uploaded_name)
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("unusable file name: {uploaded_name:?}")))?;
        Ok(self.temp_dir.path().join(name))
    }
}
