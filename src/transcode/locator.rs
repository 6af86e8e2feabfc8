//! Transcoder binary resolution.
//!
//! Locates the ffmpeg executable through an ordered chain of resolver
//! strategies: a configured override, the system search path, and finally a
//! bundled-binary fallback directory. The first strategy that produces a
//! usable path wins. A system-wide install is preferred over the bundled
//! fallback so that administrator upgrades take effect without touching the
//! app.
//!
//! Resolution runs fresh on every conversion request. Nothing is cached, so
//! replacing the global install between requests is picked up immediately.

use crate::config::ToolsConfig;
use crate::transcode::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name of the transcoding tool this application drives.
pub const FFMPEG: &str = "ffmpeg";

/// Availability information for the transcoder, as reported by
/// `check-tools` and the `/api/tools` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// A single strategy for producing an executable path.
trait Resolve {
    fn resolve(&self) -> Option<PathBuf>;
}

/// Explicit path from the config file, accepted only if it exists.
struct ConfiguredPath<'a>(Option<&'a Path>);

impl Resolve for ConfiguredPath<'_> {
    fn resolve(&self) -> Option<PathBuf> {
        match self.0 {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            _ => None,
        }
    }
}

/// Lookup through the operating system's executable search path.
struct SearchPath<'a>(&'a str);

impl Resolve for SearchPath<'_> {
    fn resolve(&self) -> Option<PathBuf> {
        which::which(self.0).ok()
    }
}

/// Probe a fixed directory for a bundled platform-specific binary.
struct FallbackDir<'a> {
    dir: &'a Path,
    tool: &'a str,
}

impl Resolve for FallbackDir<'_> {
    fn resolve(&self) -> Option<PathBuf> {
        let candidate = self.dir.join(platform_exe_name(self.tool));
        if is_executable(&candidate) {
            Some(candidate)
        } else {
            None
        }
    }
}

/// Resolve the ffmpeg executable for a conversion request.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if no strategy yields a usable path.
pub fn locate_ffmpeg(tools: &ToolsConfig) -> Result<PathBuf> {
    locate(FFMPEG, tools.ffmpeg_path.as_deref(), &tools.fallback_dir)
}

/// Resolve an arbitrary tool name through the full strategy chain.
fn locate(tool: &str, override_path: Option<&Path>, fallback_dir: &Path) -> Result<PathBuf> {
    let strategies: [&dyn Resolve; 3] = [
        &ConfiguredPath(override_path),
        &SearchPath(tool),
        &FallbackDir {
            dir: fallback_dir,
            tool,
        },
    ];

    strategies
        .iter()
        .find_map(|s| s.resolve())
        .ok_or_else(|| Error::tool_not_found(tool))
}

/// Check transcoder availability without failing.
pub fn check_ffmpeg(tools: &ToolsConfig) -> ToolInfo {
    match locate_ffmpeg(tools) {
        Ok(path) => ToolInfo {
            name: FFMPEG.to_string(),
            available: true,
            version: detect_version(&path),
            path: Some(path),
        },
        Err(_) => ToolInfo {
            name: FFMPEG.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Run `<tool> -version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

/// Executable filename probed in the fallback directory.
fn platform_exe_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{tool}.exe")
    } else {
        tool.to_string()
    }
}

/// On unix the fallback candidate must carry an execute permission bit.
/// On Windows existence as a regular file suffices.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
