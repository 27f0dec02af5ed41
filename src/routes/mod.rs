pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use actix_web::{error, web, HttpRequest};

use crate::{auth::AuthMiddleware, error::AppError};

/// Registers every route of the API.
///
/// `/health` and `/api/auth` are public; `/api/tasks` and `/api/profile` sit
/// behind [`AuthMiddleware`]. Malformed JSON bodies and query strings are
/// answered as `AppError::BadRequest`; a task id that is not a UUID names no
/// task and is answered like any other missing task.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::signup)
                        .service(auth::login),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(AuthMiddleware)
                        .service(tasks::get_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                )
                .service(
                    web::scope("/profile")
                        .wrap(AuthMiddleware)
                        .service(profile::get_profile),
                ),
        );
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected JSON body on {}: {}", req.path(), err);
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected query string on {}: {}", req.path(), err);
    AppError::BadRequest(format!("Invalid query parameters: {}", err)).into()
}

fn path_error(err: error::PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected path on {}: {}", req.path(), err);
    AppError::NotFound("Task not found".into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PasswordHasher, TokenService};
    use crate::state::AppState;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let state = AppState::in_memory(TokenService::new(b"routes-secret"), PasswordHasher::new(4));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_malformed_task_id_is_not_found() {
        let state = AppState::in_memory(TokenService::new(b"routes-secret"), PasswordHasher::new(4));
        let user = state.credentials.create("Ann", "ann@x.com", "pw1").await.unwrap();
        let token = state.tokens.issue(user.id).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/tasks/42")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Task not found");
    }

    #[actix_web::test]
    async fn test_protected_scopes_require_token() {
        let state = AppState::in_memory(TokenService::new(b"routes-secret"), PasswordHasher::new(4));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(config),
        )
        .await;

        for uri in ["/api/tasks", "/api/profile"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
