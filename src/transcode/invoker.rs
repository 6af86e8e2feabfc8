//! Transcode invocation.
//!
//! Builds and runs the ffmpeg child process that extracts the audio stream
//! of an MP4 file into an MP3. The argument vector is fixed; the only tokens
//! that vary between invocations are the input path after `-i` and the
//! trailing output path, so no user-controlled string ever lands in a flag
//! position.
//!
//! The call blocks until the child exits. There is no timeout: a hung
//! transcoder blocks the invoking thread indefinitely. Callers on an async
//! runtime must run this on a blocking thread.

use crate::config::ToolsConfig;
use crate::transcode::locator::{locate_ffmpeg, FFMPEG};
use crate::transcode::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Extension appended to the derived output filename.
pub const OUTPUT_EXTENSION: &str = "mp3";

/// Fixed MP3 encoder passed to `-acodec`.
const AUDIO_CODEC: &str = "libmp3lame";

/// Fixed VBR quality passed to `-q:a` (0 = best, 9 = worst).
const AUDIO_QUALITY: &str = "2";

/// Derive the output filename from the input's base name.
///
/// `clip.mp4` becomes `clip.mp3`. Fails if the input path has no stem.
pub fn output_file_name(input: &Path) -> Result<String> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::InvalidInput(format!("no file name in {}", input.display())))?;
    Ok(format!("{stem}.{OUTPUT_EXTENSION}"))
}

/// Build the fixed ffmpeg argument vector.
fn build_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        AUDIO_CODEC.to_string(),
        "-q:a".to_string(),
        AUDIO_QUALITY.to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Convert a video file to MP3, writing the result into `output_dir`.
///
/// Resolves the transcoder fresh for this call, runs it synchronously, and
/// returns the output path on success.
///
/// # Errors
///
/// - [`Error::FileNotFound`] if the input does not exist.
/// - [`Error::ToolNotFound`] if ffmpeg cannot be resolved.
/// - [`Error::ToolFailed`] with captured stderr on a non-zero exit.
pub fn convert_to_mp3(input: &Path, output_dir: &Path, tools: &ToolsConfig) -> Result<PathBuf> {
    if !input.exists() {
        return Err(Error::file_not_found(input));
    }

    let output_path = output_dir.join(output_file_name(input)?);

    let ffmpeg = locate_ffmpeg(tools)?;
    let args = build_args(input, &output_path);

    debug!("Transcoder: {} args: {:?}", ffmpeg.display(), args);

    let result = Command::new(&ffmpeg).args(&args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::tool_not_found(FFMPEG)
        } else {
            Error::Io(e)
        }
    })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::tool_failed(FFMPEG, stderr.trim()));
    }

    info!("Transcode complete: {}", output_path.display());
    Ok(output_path)
}
