//! Transcoder resolution and invocation.
//!
//! The core of the application: find an ffmpeg executable on the host and
//! drive it to extract the audio stream of an uploaded video. Everything in
//! here is synchronous and request-scoped; state is never shared across
//! conversions.

mod error;
pub mod invoker;
pub mod locator;
mod workspace;

pub use error::{Error, Result};
pub use invoker::{convert_to_mp3, output_file_name};
pub use locator::{check_ffmpeg, locate_ffmpeg, ToolInfo};
pub use workspace::Scratch;
