//! 图片上传集成测试

mod common;

use axum::body::Body;
use common::TestApp;
use http::{Method, Request, StatusCode, header};
use serde_json::Value;
use std::io::Cursor;

const BOUNDARY: &str = "----catalog-test-boundary";

fn png_bytes(shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([shade, 0, 0]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn upload(app: &TestApp, field: &str, filename: &str, data: &[u8]) -> (StatusCode, Value) {
    let (status, bytes) = app.send(multipart_request(field, filename, data)).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_upload_stores_and_serves_image() {
    let app = TestApp::new().await;
    let png = png_bytes(200);

    let (status, body) = upload(&app, "image", "Photo.PNG", &png).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let stored = app
        .state
        .config
        .uploads_dir()
        .join(url.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(&stored).unwrap(), png);

    let request = Request::builder().uri(&url).body(Body::empty()).unwrap();
    let response_bytes = app.send(request).await;
    assert_eq!(response_bytes.0, StatusCode::OK);
    assert_eq!(response_bytes.1, png);
}

#[tokio::test]
async fn test_identical_uploads_share_one_file() {
    let app = TestApp::new().await;
    let png = png_bytes(10);

    let (_, first) = upload(&app, "image", "a.png", &png).await;
    let (_, second) = upload(&app, "image", "b.png", &png).await;
    assert_eq!(first["url"], second["url"]);

    let (_, other) = upload(&app, "image", "c.png", &png_bytes(11)).await;
    assert_ne!(first["url"], other["url"]);

    let files = std::fs::read_dir(app.state.config.uploads_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .count();
    assert_eq!(files, 2);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;
    let png = png_bytes(1);

    let (status, body) = upload(&app, "image", "notes.txt", &png).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6502);

    let (status, body) = upload(&app, "image", "fake.jpg", b"definitely not a jpeg").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6503);

    let (status, body) = upload(&app, "file", "photo.png", &png).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6504);

    let (status, body) = upload(&app, "image", "empty.png", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6505);
}

#[tokio::test]
async fn test_upload_too_large() {
    let mut app = TestApp::new().await;
    let mut state = app.state.clone();
    state.config.max_upload_bytes = 16;
    app.router = admin_server::build_router(state);

    let (status, body) = upload(&app, "image", "big.png", &png_bytes(5)).await;
    // Even a 2x2 PNG is larger than 16 bytes
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6501);
}

#[tokio::test]
async fn test_oversized_body_is_json_file_too_large() {
    let mut app = TestApp::new().await;
    let mut state = app.state.clone();
    state.config.max_upload_bytes = 1024;
    app.router = admin_server::build_router(state);

    // A large leading field pushes the body past the request limit before
    // the image field is reached
    let mut body = Vec::new();
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"padding\"\r\n\r\n")
            .as_bytes(),
    );
    body.extend(std::iter::repeat_n(b'x', 256 * 1024));
    body.extend_from_slice(
        format!(
            "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png_bytes(9));
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let (status, bytes) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 6501);
    assert!(body["error"].as_str().unwrap().contains("too large"), "{body}");
}

#[tokio::test]
async fn test_serving_rejects_traversal_and_missing_files() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/uploads/..%2Fdatabase%2Fcatalog.db")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/uploads/missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3);
}
