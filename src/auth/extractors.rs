use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The user resolved by `AuthMiddleware` for the current request.
///
/// This extractor is intended for handlers inside a scope wrapped by
/// `AuthMiddleware`, which verifies the bearer token, loads the user (without its
/// password hash) and inserts it into request extensions.
///
/// If no user is found in the extensions this extractor fails with
/// `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> uuid::Uuid {
        self.0.id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized("No token provided".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
