//! API integration tests.
//!
//! Tests HTTP endpoints against a [`TestHarness`] server running on a
//! random port.

mod common;

use common::TestHarness;

// ---------------------------------------------------------------------------
// Health check and page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_200() {
    let (_harness, addr) = TestHarness::with_server().await;
    let url = format!("http://{addr}/health");

    let resp = reqwest::get(&url).await.expect("request failed");
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn index_serves_upload_page() {
    let (_harness, addr) = TestHarness::with_server().await;
    let url = format!("http://{addr}/");

    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("MP4"));
    assert!(body.contains("Convert to MP3"));
}

#[tokio::test]
async fn tools_endpoint_reports_ffmpeg() {
    let (_harness, addr) = TestHarness::with_server().await;
    let url = format!("http://{addr}/api/tools");

    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["name"], "ffmpeg");
    assert!(json["available"].is_boolean());
}

// ---------------------------------------------------------------------------
// Upload boundary
// ---------------------------------------------------------------------------

fn file_form(name: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(name.to_string())
        .mime_str("video/mp4")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}

#[tokio::test]
async fn rejects_non_mp4_extension() {
    let (_harness, addr) = TestHarness::with_server().await;
    let url = format!("http://{addr}/api/convert");

    let form = file_form("notes.txt", b"hello".to_vec());
    let resp = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains(".mp4"));
}

#[tokio::test]
async fn rejects_upload_without_file_field() {
    let (_harness, addr) = TestHarness::with_server().await;
    let url = format!("http://{addr}/api/convert");

    let form = reqwest::multipart::Form::new().text("other", "value");
    let resp = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn oversized_upload_never_reaches_the_transcoder() {
    // 1 MiB ceiling; upload 2 MiB. No stub transcoder is installed, so a
    // conversion attempt would surface as a 5xx rather than 413.
    let mut config = audiopress::config::Config::default();
    config.upload.max_size_mb = 1;

    let (_harness, addr) = TestHarness::with_server_config(config).await;
    let url = format!("http://{addr}/api/convert");

    let form = file_form("big.mp4", vec![0u8; 2 * 1024 * 1024]);
    let resp = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
}
