//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wraps an [`AppContext`] built from a
//! request-supplied config. The [`with_server`] constructors start Axum on a
//! random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use audiopress::config::Config;
use audiopress::server::{create_router, AppContext};

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let ctx = AppContext {
            config: Arc::new(config),
        };
        Self { ctx }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Install a stub transcoder script into `dir` and return its path.
///
/// The script is wired in through the configured-override resolver strategy,
/// which keeps the tests independent of whatever the host has on its PATH.
#[cfg(unix)]
pub fn install_stub_transcoder(dir: &Path, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg-stub");
    std::fs::write(&path, script).expect("failed to write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod stub");
    path
}

/// Stub that writes a fake MP3 payload to its last argument and exits 0.
#[cfg(unix)]
pub const STUB_OK: &str =
    "#!/bin/sh\nfor a in \"$@\"; do out=\"$a\"; done\nprintf 'ID3 fake audio payload' > \"$out\"\n";

/// Stub that prints a diagnostic to stderr and exits 1.
#[cfg(unix)]
pub const STUB_FAIL: &str =
    "#!/bin/sh\necho 'Invalid data found when processing input' >&2\nexit 1\n";
