//! Audiopress - web-based MP4 to MP3 converter
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod server;
pub mod transcode;
