use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Size ceiling for uploaded files, in MiB. Requests above it are
    /// rejected at the boundary and never reach the transcoder.
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
}

fn default_max_size_mb() -> u64 {
    500
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
        }
    }
}

impl UploadConfig {
    /// Ceiling in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit path to the ffmpeg executable. Takes precedence over the
    /// search path when set and existing.
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Directory probed for a bundled ffmpeg when the search path misses.
    /// Relative paths are resolved against the working directory.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: PathBuf,
}

fn default_fallback_dir() -> PathBuf {
    PathBuf::from("bin")
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            fallback_dir: default_fallback_dir(),
        }
    }
}
