mod common;

use actix_web::{http::StatusCode, test};
use common::{send, signup, spawn_app, spawn_app_with, test_state, with_token};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test_log::test(actix_web::test)]
async fn test_signup_and_login_flow() {
    let app = spawn_app().await;

    let registered = signup(&app, "Ann", "  Ann@X.com ", "pw1").await;
    assert_eq!(registered.user.name, "Ann");
    assert_eq!(registered.user.email, "ann@x.com");
    assert!(!registered.token.is_empty());

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    assert_eq!(body["user"]["id"], json!(registered.user.id));
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The login token opens the protected scopes.
    let token = body["token"].as_str().unwrap();
    let (status, _) = send(
        &app,
        with_token(test::TestRequest::get().uri("/api/tasks"), token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_auth_responses_never_expose_password_material() {
    let app = spawn_app().await;

    let (_, signup_body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "name": "Ann", "email": "ann@x.com", "password": "pw1" })),
    )
    .await;
    let (_, login_body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@x.com", "password": "pw1" })),
    )
    .await;

    for body in [signup_body, login_body] {
        let text = body.to_string();
        assert!(!text.contains("password"), "leaked: {}", text);
        assert!(!text.contains("$2"), "leaked a hash: {}", text);
        let user = body["user"].as_object().unwrap();
        let mut keys: Vec<_> = user.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["email", "id", "name"]);
    }
}

#[actix_web::test]
async fn test_duplicate_signup_is_rejected_without_creating_a_user() {
    let state = test_state();
    let app = spawn_app_with(state.clone()).await;

    let first = signup(&app, "Ann", "ann@x.com", "pw1").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "name": "Impostor", "email": " ANN@x.com", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    // The first account is untouched and still answers to its password.
    let stored = state
        .credentials
        .find_by_email("ann@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.user.id);
    assert_eq!(stored.name, "Ann");
    assert!(state
        .credentials
        .authenticate("ann@x.com", "pw1")
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn test_signup_requires_all_fields() {
    let app = spawn_app().await;

    let payloads = [
        json!({ "email": "ann@x.com", "password": "pw1" }),
        json!({ "name": "Ann", "password": "pw1" }),
        json!({ "name": "Ann", "email": "ann@x.com" }),
        json!({ "name": "", "email": "ann@x.com", "password": "pw1" }),
        json!({ "name": "Ann", "email": "not-an-email", "password": "pw1" }),
    ];
    for payload in payloads {
        let (status, body) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(&payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", payload);
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    signup(&app, "Ann", "ann@x.com", "pw1").await;

    let (wrong_password_status, wrong_password) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@x.com", "password": "nope" })),
    )
    .await;
    let (unknown_email_status, unknown_email) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "bob@x.com", "password": "pw1" })),
    )
    .await;

    assert_eq!(wrong_password_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_email_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[actix_web::test]
async fn test_login_requires_email_and_password() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ann@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_rejected_tokens() {
    let app = spawn_app().await;
    let registered = signup(&app, "Ann", "ann@x.com", "pw1").await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    // Change a character inside the signature, away from its padding bits.
    let (head, signature) = registered.token.rsplit_once('.').unwrap();
    let mut signature: Vec<char> = signature.chars().collect();
    signature[10] = if signature[10] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}.{}", head, signature.into_iter().collect::<String>());
    let (status, body) = send(
        &app,
        with_token(test::TestRequest::get().uri("/api/profile"), &tampered),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    // A token signed by another application instance is not accepted either.
    let foreign = taskkeeper::auth::TokenService::new(b"another-secret")
        .issue(registered.user.id)
        .unwrap();
    let (status, _) = send(
        &app,
        with_token(test::TestRequest::get().uri("/api/profile"), &foreign),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
