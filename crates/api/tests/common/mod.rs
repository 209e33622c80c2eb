#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;

/// Boundary used by [`multipart_body`].
const BOUNDARY: &str = "campus-test-boundary";

/// Build a test `ServerConfig` with safe defaults, storing uploads in
/// `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 64 * 1024,
        frontend_dir: None,
    }
}

/// Build the full application router (same middleware stack as production)
/// over `pool`, with uploads written to `upload_dir`.
pub fn build_test_app_with_uploads(pool: PgPool, upload_dir: &Path) -> Router {
    let config = test_config(upload_dir);
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Build the full application router with uploads going to a throwaway
/// directory.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, &std::env::temp_dir().join("campus-api-tests"))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

/// A file part for [`post_multipart`] / [`put_multipart`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn multipart_request(
    app: Router,
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<&FilePart<'_>>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<&FilePart<'_>>,
) -> Response<Body> {
    multipart_request(app, Method::POST, uri, fields, file).await
}

pub async fn put_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<&FilePart<'_>>,
) -> Response<Body> {
    multipart_request(app, Method::PUT, uri, fields, file).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a trainer through the API, returning its id.
pub async fn create_trainer(pool: &PgPool, last_name: &str) -> i64 {
    let email = format!("{}@campus.test", last_name.to_lowercase());
    let response = post_multipart(
        build_test_app(pool.clone()),
        "/api/formateurs",
        &[
            ("first_name", "Grace"),
            ("last_name", last_name),
            ("specialty", "Compilers"),
            ("email", &email),
            ("phone", "+1 555 0100"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), 201, "trainer fixture failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a course through the API, returning its id.
pub async fn create_course(pool: &PgPool, trainer_id: i64, title: &str, capacity: i32) -> i64 {
    let trainer_id = trainer_id.to_string();
    let capacity = capacity.to_string();
    let response = post_multipart(
        build_test_app(pool.clone()),
        "/api/formations",
        &[
            ("title", title),
            ("description", "Hands-on workshop"),
            ("category", "Programming"),
            ("duration_hours", "21"),
            ("start_date", "2025-03-03"),
            ("end_date", "2025-03-05"),
            ("capacity", &capacity),
            ("level", "beginner"),
            ("trainer_id", &trainer_id),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), 201, "course fixture failed");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a trainee through the API, returning its id.
pub async fn create_trainee(pool: &PgPool, email: &str) -> i64 {
    let response = post_multipart(
        build_test_app(pool.clone()),
        "/api/apprenants",
        &[
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("birth_date", "1995-12-10"),
            ("email", email),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), 201, "trainee fixture failed");
    body_json(response).await["id"].as_i64().unwrap()
}
