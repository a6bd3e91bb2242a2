#![allow(dead_code)]

use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use qrstyle::server::{AppState, ServerConfig, build_app_router};

/// Gate header sent by every helper unless noted.
pub const GATE_HEADER: &str = "x-rapidapi-host";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        public_base_url: "http://qr.test".to_string(),
        render_cache_capacity: 16,
        logo_fetch_timeout_secs: 1,
        ..ServerConfig::default()
    }
}

/// Build the full application router, returning the state for inspection.
pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::new(config);
    (build_app_router(state.clone()), state)
}

/// GET with the gate header.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(GATE_HEADER, "qr.test")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// GET without any headers.
pub async fn get_ungated(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an urlencoded form with the gate header.
pub async fn post_form(app: Router, uri: &str, form: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(GATE_HEADER, "qr.test")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart form with the gate header. Each part is
/// `(name, Some(filename), bytes)` for files or `(name, None, text)`.
pub async fn post_multipart(app: Router, uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Response<Body> {
    const BOUNDARY: &str = "qrstyle-test-boundary";
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::post(uri)
        .header(GATE_HEADER, "qr.test")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn content_type(response: &Response<Body>) -> &str {
    response.headers()[header::CONTENT_TYPE].to_str().unwrap()
}

/// Decodes a raster response body.
pub async fn body_image(response: Response<Body>) -> image::RgbaImage {
    image::load_from_memory(&body_bytes(response).await)
        .unwrap()
        .to_rgba8()
}

/// A small opaque PNG, usable as a logo upload.
pub fn png_logo(color: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(16, 16, image::Rgba(color));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

/// Serves `body` as a PNG to one connection on loopback and returns its URL.
pub async fn serve_png_once(body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(&body).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}/logo.png")
}
