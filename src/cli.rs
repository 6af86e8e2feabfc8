use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audiopress")]
#[command(author, version, about = "Extract MP3 audio from MP4 videos through a web UI")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server with the upload UI
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Convert a single MP4 file to MP3
    Convert {
        /// Input video file
        #[arg(required = true)]
        input: PathBuf,

        /// Directory for the output file (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that the ffmpeg executable can be resolved
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
