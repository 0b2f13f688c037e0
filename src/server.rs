//! HTTP API exposing the conversion pipeline.
//!
//! Endpoints:
//!
//! * `POST /api/convert`: multipart upload, field `file`. JSON response.
//! * `POST /raw`: multipart upload, field `doc`. Plain-text response
//!   carrying the Markdown directly (no JSON envelope).
//! * `GET /_healthcheck`: liveness probe, returns `OK`.
//! * anything else: `404 Not Found`.
//!
//! All handlers share one [`Converter`] behind an `Arc`, so every default
//! conversion in the process reuses the same cached renderer engine.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::ConvertOptions;
use crate::convert::{is_legacy_doc, Converter};

/// Uploads above this size are refused by the framework (413).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
pub fn router(converter: Arc<Converter>) -> Router {
    Router::new()
        .route("/api/convert", post(api_convert))
        .route("/raw", post(raw_convert))
        .route("/_healthcheck", get(healthcheck))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(converter)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, converter: Arc<Converter>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(converter)).await
}

async fn healthcheck() -> &'static str {
    "OK"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// The uploaded document, pulled out of a multipart body.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Read the first multipart field named `field_name`.
///
/// Returns `Ok(None)` when the body has no such field; transport-level
/// multipart errors also collapse to `None` since the caller's only recourse
/// is the same 400 response.
async fn read_upload(multipart: &mut Multipart, field_name: &str) -> Option<Upload> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some(field_name) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.docx").to_string();
        match field.bytes().await {
            Ok(bytes) => {
                return Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                })
            }
            Err(e) => {
                warn!("Failed to read multipart field '{}': {}", field_name, e);
                return None;
            }
        }
    }
    None
}

/// `POST /api/convert`: the JSON endpoint.
async fn api_convert(
    State(converter): State<Arc<Converter>>,
    mut multipart: Multipart,
) -> Response {
    let Some(upload) = read_upload(&mut multipart, "file").await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "You must upload a file to convert.",
                "message": "Include a multipart form field named 'file' containing a .docx document.",
            })),
        )
            .into_response();
    };

    if is_legacy_doc(&upload.filename) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Invalid file type",
                "message": "Legacy .doc files are not supported. Save the document as .docx and try again.",
            })),
        )
            .into_response();
    }

    let size = upload.bytes.len();
    info!("Converting upload '{}' ({} bytes)", upload.filename, size);

    match converter
        .convert_bytes(upload.bytes, &ConvertOptions::default())
        .await
    {
        Ok(markdown) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "markdown": markdown,
                "originalFilename": upload.filename,
                "size": size,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Conversion of '{}' failed: {}", upload.filename, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error",
                    "message": "An unexpected error occurred during conversion.",
                })),
            )
                .into_response()
        }
    }
}

/// `POST /raw`: plain-text endpoint for scripting; the body of a success
/// response is the Markdown itself.
async fn raw_convert(
    State(converter): State<Arc<Converter>>,
    mut multipart: Multipart,
) -> Response {
    let Some(upload) = read_upload(&mut multipart, "doc").await else {
        return plain_error(
            StatusCode::BAD_REQUEST,
            "You must upload a file to convert. Include a multipart form field named 'doc'.",
        );
    };

    if is_legacy_doc(&upload.filename) {
        return plain_error(
            StatusCode::BAD_REQUEST,
            "Legacy .doc files are not supported. Save the document as .docx and try again.",
        );
    }

    match converter
        .convert_bytes(upload.bytes, &ConvertOptions::default())
        .await
    {
        Ok(markdown) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            markdown,
        )
            .into_response(),
        Err(e) => {
            error!("Raw conversion of '{}' failed: {}", upload.filename, e);
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            plain_error(status, &e.to_string())
        }
    }
}

/// Plain-text error response. The message is HTML-escaped so a browser that
/// sniffs the body cannot interpret document fragments as markup.
fn plain_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        escape_html(message),
    )
        .into_response()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
