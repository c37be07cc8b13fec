#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stockroom_api::config::ServerConfig;
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_core::media::{MediaError, MediaStore, UploadedMedia};

pub const BOUNDARY: &str = "stockroom-test-boundary";

// ---------------------------------------------------------------------------
// Fake media host
// ---------------------------------------------------------------------------

/// In-memory media host. Records every call and can be told to fail.
#[derive(Default)]
pub struct FakeMediaStore {
    pub fail_upload: AtomicBool,
    pub fail_destroy: AtomicBool,
    pub uploads: Mutex<Vec<(String, usize)>>,
    pub destroyed: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    pub fn failing_destroy() -> Self {
        let store = Self::default();
        store.fail_destroy.store(true, Ordering::SeqCst);
        store
    }

    pub fn failing_upload() -> Self {
        let store = Self::default();
        store.fail_upload.store(true, Ordering::SeqCst);
        store
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn destroyed_keys(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(MediaError::Api {
                status: 503,
                body: "upload unavailable".into(),
            });
        }
        let mut uploads = self.uploads.lock().unwrap();
        let key = format!("img{}", uploads.len() + 1);
        let ext = content_type.rsplit('/').next().unwrap_or("bin");
        uploads.push((content_type.to_string(), bytes.len()));
        Ok(UploadedMedia {
            url: format!("https://media.test/demo/image/upload/v1/{folder}/{key}.{ext}"),
            key,
        })
    }

    async fn destroy(&self, key: &str, folder: &str) -> Result<(), MediaError> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(MediaError::Request("connection reset".into()));
        }
        self.destroyed
            .lock()
            .unwrap()
            .push(format!("{folder}/{key}"));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a small 1 KiB image limit so size
/// checks are cheap to exercise.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_image_bytes: 1024,
        media_folder: "products".to_string(),
    }
}

/// Build the full application router backed by a fresh [`FakeMediaStore`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_media(pool, Arc::new(FakeMediaStore::default()))
}

/// Build the full application router with the given media store.
///
/// Uses the same `build_app_router` as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app_with_media(pool: PgPool, media: Arc<FakeMediaStore>) -> Router {
    build_test_app_with_config(pool, media, test_config())
}

/// Build the full application router with the given media store and config.
pub fn build_test_app_with_config(
    pool: PgPool,
    media: Arc<FakeMediaStore>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

/// One part of a multipart form.
pub enum Part {
    Text(&'static str, String),
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

pub fn text(name: &'static str, value: impl ToString) -> Part {
    Part::Text(name, value.to_string())
}

/// A small PNG-typed image part.
pub fn png(size: usize) -> Part {
    Part::File {
        name: "image",
        file_name: "photo.png",
        content_type: "image/png",
        bytes: vec![0xAB; size],
    }
}

/// Encode parts as a `multipart/form-data` body using [`BOUNDARY`].
pub fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: Vec<Part>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a category through the API and return its id.
pub async fn create_category(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/categories",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), 201, "category fixture should be created");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a product through the API with the given media store and return
/// the JSON body.
pub async fn create_product(
    pool: &PgPool,
    media: Arc<FakeMediaStore>,
    name: &str,
    category_id: i64,
) -> serde_json::Value {
    let response = send_multipart(
        build_test_app_with_media(pool.clone(), media),
        Method::POST,
        "/",
        vec![
            text("name", name),
            text("price", "12.50"),
            text("stockQuantity", 4),
            text("categoryId", category_id),
            png(64),
        ],
    )
    .await;
    assert_eq!(response.status(), 201, "product fixture should be created");
    body_json(response).await
}
