#![allow(dead_code, unused_macros)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use serde_json::json;
use tempfile::TempDir;

use bookstore::app::AppState;
use bookstore::auth::AuthResponse;
use bookstore::config::{Config, JwtSettings, StorageBackend};
use bookstore::models::UserResponse;
use bookstore::repository::Repositories;
use bookstore::seed;

pub const ADMIN_EMAIL: &str = "admin@bookstore.test";
pub const USER_EMAIL: &str = "reader@bookstore.test";
pub const PASSWORD: &str = "P@ssword1";

/// Builds an `App` around the given `AppState`, with the same routes the binary serves.
macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}

/// Settings for a server backed by the in-memory store. Covers go to `images_dir`.
pub fn test_config(images_dir: &TempDir) -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        jwt: JwtSettings {
            secret: "integration-test-secret".to_string(),
            issuer: "bookstore-api".to_string(),
            audience: "bookstore-client".to_string(),
            duration_minutes: 10,
        },
        bcrypt_cost: 4,
        cover_image_dir: images_dir.path().to_path_buf(),
        cors_allowed_origins: Vec::new(),
        admin_account: None,
    }
}

/// Fresh state over an empty in-memory store. Keep the `TempDir` alive for the test.
pub fn test_state() -> (AppState, TempDir) {
    let images_dir = tempfile::tempdir().expect("Failed to create cover directory");
    let state = AppState::new(Repositories::in_memory(), &test_config(&images_dir));
    (state, images_dir)
}

/// Status of a request, including rejections raised by the auth middleware.
pub async fn status_of<S, B>(app: &S, req: Request) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(e) => e.error_response().status(),
    }
}

pub async fn register<S, B>(app: &S, email: &str) -> UserResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": email,
            "password": PASSWORD,
            "firstName": "Test",
            "lastName": "Reader"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "Registration of {} failed", email);
    test::read_body_json(resp).await
}

pub async fn login<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "Login of {} failed", email);
    let auth: AuthResponse = test::read_body_json(resp).await;
    auth.token
}

/// Creates the administrator account the same way start-up does.
pub async fn seed_admin(state: &AppState) {
    seed::ensure_admin(&*state.repositories.users, &state.hasher, ADMIN_EMAIL, PASSWORD)
        .await
        .expect("Failed to seed administrator");
}

/// Seeds an administrator, registers a regular user and returns both tokens.
pub async fn admin_and_user_tokens<S, B>(state: &AppState, app: &S) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    seed_admin(state).await;
    register(app, USER_EMAIL).await;
    (login(app, ADMIN_EMAIL).await, login(app, USER_EMAIL).await)
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}
