//! Upload page and conversion endpoints.

use crate::server::AppContext;
use crate::transcode::{self, Scratch};
use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

/// Embedded single-page upload form.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// The one accepted upload container.
const INPUT_EXTENSION: &str = "mp4";

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(index))
        .route("/api/convert", post(convert))
        .route("/api/tools", get(tools))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Report transcoder availability so the page can warn up front.
async fn tools(State(ctx): State<AppContext>) -> Result<Json<transcode::ToolInfo>, StatusCode> {
    let tools_config = ctx.config.tools.clone();
    let info = tokio::task::spawn_blocking(move || transcode::check_ffmpeg(&tools_config))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(info))
}

/// Accept one MP4 upload, convert it, and stream the MP3 back.
///
/// The uploaded bytes are streamed into a request-scoped scratch directory
/// and counted against the configured ceiling before the transcoder is ever
/// invoked. The scratch directory lives exactly as long as the response
/// body.
async fn convert(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let ceiling = ctx.config.upload.max_size_bytes();

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "Upload has no file name".to_string()))?;

        if !is_accepted_upload(&file_name) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Only .{INPUT_EXTENSION} uploads are accepted"),
            ));
        }

        let scratch = Scratch::new().map_err(internal)?;
        let input_path = scratch
            .input_path(&file_name)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

        let mut file = tokio::fs::File::create(&input_path).await.map_err(internal)?;
        let mut written: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            written += chunk.len() as u64;
            if written > ceiling {
                return Err((
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!(
                        "File exceeds the {} MiB size limit",
                        ctx.config.upload.max_size_mb
                    ),
                ));
            }
            file.write_all(&chunk).await.map_err(internal)?;
        }
        file.flush().await.map_err(internal)?;
        drop(file);

        tracing::info!("Received upload {} ({} bytes)", file_name, written);

        // The transcode blocks for its whole duration, so it runs on a
        // blocking worker thread. There is no timeout; a hung ffmpeg holds
        // the request open.
        let tools_config = ctx.config.tools.clone();
        let scratch_dir = scratch.path().to_path_buf();
        let output = tokio::task::spawn_blocking(move || {
            transcode::convert_to_mp3(&input_path, &scratch_dir, &tools_config)
        })
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(transcode_error)?;

        return download_response(scratch, &output).await;
    }

    Err((
        StatusCode::BAD_REQUEST,
        "No file field in upload".to_string(),
    ))
}

/// Stream the produced MP3 back as an attachment.
async fn download_response(
    scratch: Scratch,
    output: &Path,
) -> Result<Response, (StatusCode, String)> {
    let file_name = output
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("audio.mp3")
        .to_string();

    let metadata = tokio::fs::metadata(output).await.map_err(internal)?;
    let file = tokio::fs::File::open(output).await.map_err(internal)?;

    // The scratch directory must outlive the body; moving it into the
    // stream ties its removal to the last chunk being sent.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _scratch = &scratch;
        chunk
    });
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_LENGTH, metadata.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(body)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

fn is_accepted_upload(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION))
        .unwrap_or(false)
}

fn multipart_error(err: MultipartError) -> (StatusCode, String) {
    (err.status(), err.body_text())
}

fn transcode_error(err: transcode::Error) -> (StatusCode, String) {
    match err {
        transcode::Error::ToolNotFound { tool } => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!(
                "{tool} was not found. Install it system-wide or place the binary \
                 in the fallback directory."
            ),
        ),
        transcode::Error::ToolFailed { stderr, .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Conversion failed: {stderr}"),
        ),
        transcode::Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn internal(err: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
