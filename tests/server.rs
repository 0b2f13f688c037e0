//! HTTP API tests, driven through the router with tower's `oneshot`.

#![cfg(feature = "server")]

use std::io::{Cursor, Write};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use markdocx::server::router;
use markdocx::Converter;
use serde_json::Value;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;

const BOUNDARY: &str = "MARKDOCX-TEST-BOUNDARY";

fn app() -> axum::Router {
    router(Arc::new(Converter::new()))
}

/// Minimal .docx with one "Hello World" paragraph.
fn sample_docx() -> Vec<u8> {
    let document = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
        <w:body><w:p><w:r><w:t>Hello World</w:t></w:r></w:p></w:body></w:document>";
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

/// Hand-rolled multipart body with a single file field.
fn multipart_body(field_name: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

#[tokio::test]
async fn healthcheck_returns_ok() {
    let response = app()
        .oneshot(Request::get("/_healthcheck").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn unknown_route_is_404_not_found() {
    let response = app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not Found");
}

#[tokio::test]
async fn convert_valid_docx_returns_markdown_envelope() {
    let docx = sample_docx();
    let size = docx.len();
    let request = multipart_request("/api/convert", multipart_body("file", "hello.docx", &docx));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["markdown"], "Hello World");
    assert_eq!(json["originalFilename"], "hello.docx");
    assert_eq!(json["size"], size);
}

#[tokio::test]
async fn convert_without_file_field_is_400() {
    let request = multipart_request(
        "/api/convert",
        multipart_body("wrong_field", "hello.docx", &sample_docx()),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "You must upload a file to convert.");
}

#[tokio::test]
async fn convert_legacy_doc_filename_is_400_invalid_type() {
    let request = multipart_request(
        "/api/convert",
        multipart_body("file", "letter.doc", &sample_docx()),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid file type");
}

#[tokio::test]
async fn convert_corrupt_upload_is_500_internal() {
    let request = multipart_request(
        "/api/convert",
        multipart_body("file", "broken.docx", b"not a zip"),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(
        json["message"],
        "An unexpected error occurred during conversion."
    );
}

#[tokio::test]
async fn raw_endpoint_returns_plain_markdown() {
    let request = multipart_request("/raw", multipart_body("doc", "hello.docx", &sample_docx()));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body_string(response).await, "Hello World");
}

#[tokio::test]
async fn raw_endpoint_without_doc_field_is_400() {
    let request = multipart_request("/raw", multipart_body("file", "hello.docx", &sample_docx()));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains("upload a file"), "got: {body}");
}

#[tokio::test]
async fn raw_endpoint_corrupt_upload_is_500() {
    // Extraction failures are server faults, not caller errors.
    let request = multipart_request("/raw", multipart_body("doc", "broken.docx", b"not a zip"));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(body.contains("extract"), "got: {body}");
}

#[tokio::test]
async fn raw_endpoint_doc_extension_is_400() {
    let request = multipart_request("/raw", multipart_body("doc", "legacy.doc", &sample_docx()));

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_string(response).await;
    assert!(body.contains(".docx"), "got: {body}");
}
