//! Error types for the transcoding core.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or running the transcoder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ffmpeg executable could not be resolved.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The transcoder ran but exited with a non-zero status.
    #[error("tool execution failed: {tool}: {stderr}")]
    ToolFailed { tool: String, stderr: String },

    /// The input path is unusable (missing, no filename, wrong extension).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The specified file was not found.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
