#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use storehub_api::auth::jwt::{generate_access_token, JwtConfig};
use storehub_api::auth::password::hash_password;
use storehub_api::config::ServerConfig;
use storehub_api::router::build_app_router;
use storehub_api::state::AppState;
use storehub_cloud::MemoryStore;
use storehub_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use storehub_core::types::DbId;
use storehub_db::models::user::{CreateUser, User};
use storehub_db::repositories::UserRepo;
use storehub_events::EventBus;

pub const TEST_PASSWORD: &str = "correct-horse-42";

/// Build a test `ServerConfig` with safe defaults and reCAPTCHA disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
        recaptcha_secret: None,
        admin: None,
        promotion_sweep_interval_secs: 3600,
    }
}

/// Handles the tests inspect besides the router.
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryStore>,
    pub event_bus: Arc<EventBus>,
    pub config: ServerConfig,
}

/// Build the application with an in-memory object store.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> TestApp {
    let storage = Arc::new(MemoryStore::default());
    let event_bus = Arc::new(EventBus::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: storage.clone(),
        event_bus: Arc::clone(&event_bus),
        http: reqwest::Client::new(),
    };
    TestApp {
        router: build_app_router(state, &config),
        storage,
        event_bus,
        config,
    }
}

/// The full router exactly as `main.rs` builds it.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config()).router
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    request(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request("PATCH", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request("DELETE", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn delete_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request("DELETE", uri, Some(token), body)).await
}

/// Send a multipart body with one `files` part per `(file_name, bytes)`.
pub async fn post_files_auth(app: Router, uri: &str, token: &str, files: Vec<(&str, Vec<u8>)>) -> Response {
    const BOUNDARY: &str = "storehub-test-boundary";
    let mut body = Vec::new();
    for (name, data) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = request("POST", uri, Some(token))
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the `data` field of the envelope.
pub async fn expect_data(response: Response, status: StatusCode) -> serde_json::Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json["data"].clone()
}

/// Parse a money string such as `"12.50"`.
pub fn money(value: &serde_json::Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"))
        .parse()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// An admin user and a bearer token for it.
pub async fn admin(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, ROLE_ADMIN).await;
    let token = token_for(user.id, ROLE_ADMIN);
    (user, token)
}

/// A customer user and a bearer token for it.
pub async fn customer(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, ROLE_CUSTOMER).await;
    let token = token_for(user.id, ROLE_CUSTOMER);
    (user, token)
}

/// Create a store through the API and return its id.
pub async fn create_store(app: Router, token: &str, name: &str) -> DbId {
    let response = post_json_auth(app, "/api/stores", token, serde_json::json!({ "name": name })).await;
    expect_data(response, StatusCode::CREATED).await["id"].as_i64().unwrap()
}

/// Create a product through the API and return its id.
pub async fn create_product(app: Router, token: &str, store_id: DbId, name: &str, price: &str, stock: i32) -> DbId {
    let response = post_json_auth(
        app,
        "/api/products",
        token,
        serde_json::json!({
            "store_id": store_id,
            "name": name,
            "price": price,
            "stock": stock,
        }),
    )
    .await;
    expect_data(response, StatusCode::CREATED).await["id"].as_i64().unwrap()
}

/// A small valid PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
