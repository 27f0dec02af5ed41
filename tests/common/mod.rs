#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};
use taskkeeper::auth::{AuthResponse, PasswordHasher, TokenService};
use taskkeeper::{routes, AppState};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Fresh in-memory state with a cheap hash cost.
pub fn test_state() -> AppState {
    AppState::in_memory(TokenService::new(TEST_SECRET), PasswordHasher::new(4))
}

/// Builds the full application around a fresh in-memory state.
pub async fn spawn_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    spawn_app_with(test_state()).await
}

pub async fn spawn_app_with(
    state: AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::config),
    )
    .await
}

/// Sends a request and returns its status with the JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

/// Signs a user up and returns the auth response, panicking on failure.
pub async fn signup(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> AuthResponse {
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    serde_json::from_value(body).expect("signup response should be an AuthResponse")
}

/// Creates a task as the holder of `token` and returns the `task` object.
pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    payload: Value,
) -> Value {
    let (status, body) = send(
        app,
        with_token(test::TestRequest::post().uri("/api/tasks"), token).set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
    body["task"].clone()
}
