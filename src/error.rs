//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by the request layer.
//! Components (password hasher, token service, stores, auth gate) fail with their own
//! typed errors; each of those converts into exactly one `AppError` variant, and each
//! `AppError` variant maps to exactly one HTTP status code.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into JSON responses of the form `{"error": "<message>"}`. Server-side failures never
//! leak their detail to the client: the detail is logged, and the client receives a
//! generic message. The [`diagnostic_errors`] middleware re-renders those responses with
//! the detail attached and is only meant for development deployments.

use actix_web::{
    dev::ServiceResponse,
    error::ResponseError,
    http::StatusCode,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::{password::HashError, token::TokenError};
use crate::store::StoreError;

/// Message sent to clients for every 500-class failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can surface from a request handler.
///
/// Each variant corresponds to a specific type of error, carrying a message
/// detailing the issue. These errors are then converted into HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication is missing or was rejected (HTTP 401).
    Unauthorized(String),
    /// Malformed or otherwise unacceptable request (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist for the caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500). The message is internal detail.
    InternalServerError(String),
    /// The backing store failed (HTTP 500). The message is internal detail.
    DatabaseError(String),
    /// Input failed validation (HTTP 400).
    ValidationError(String),
}

impl AppError {
    /// Internal detail carried by server-side failures, `None` for client errors.
    pub fn internal_detail(&self) -> Option<&str> {
        match self {
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => Some(msg),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                INTERNAL_ERROR_MESSAGE
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::ValidationFailed(msg) => AppError::ValidationError(msg),
            StoreError::EmailTaken => AppError::BadRequest("User already exists".into()),
            StoreError::NotFound => AppError::NotFound("Task not found".into()),
            StoreError::Hashing(e) => e.into(),
            StoreError::Unavailable(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Any token failure is an authentication failure, except for signing which is ours.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Invalid(_) | TokenError::Expired => {
                AppError::Unauthorized("Invalid token".into())
            }
            TokenError::Signing(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<HashError> for AppError {
    fn from(error: HashError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// Error-handler middleware that attaches the internal detail of an `AppError` to
/// 500 responses as a `detail` field. Wrap it only in development deployments.
pub fn diagnostic_errors<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, expose_internal_detail)
}

fn expose_internal_detail<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let detail = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .and_then(AppError::internal_detail)
        .map(str::to_owned);

    let Some(detail) = detail else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };

    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError().json(json!({
        "error": INTERNAL_ERROR_MESSAGE,
        "detail": detail
    }));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
