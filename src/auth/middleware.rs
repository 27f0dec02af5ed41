use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderMap},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::extractors::AuthenticatedUser;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Why the gate turned a request away.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No `Authorization: Bearer <token>` header, or a malformed one.
    #[error("no bearer token supplied")]
    NoCredentials,
    /// The token failed verification or names a user that no longer exists.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl From<GateError> for AppError {
    fn from(error: GateError) -> AppError {
        match error {
            GateError::NoCredentials => AppError::Unauthorized("No token provided".into()),
            GateError::Unauthenticated(_) => AppError::Unauthorized("Invalid token".into()),
        }
    }
}

/// Returns the token of an `Authorization: Bearer <token>` header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token of `req` to an existing user.
///
/// Nothing is cached: every request verifies its token and reloads its user.
async fn authenticate(req: &ServiceRequest) -> Result<User, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::InternalServerError("application state is not registered".into())
    })?;

    let token = bearer_token(req.headers()).ok_or(GateError::NoCredentials)?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        log::debug!("rejected bearer token on {}: {}", req.path(), e);
        GateError::Unauthenticated(e.to_string())
    })?;

    match state.credentials.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            log::debug!("bearer token subject {} does not exist", user_id);
            Err(GateError::Unauthenticated("unknown subject".into()).into())
        }
    }
}

/// Authentication gate for protected scopes.
///
/// Requests without a valid bearer token for an existing user are answered with
/// 401 and never reach the wrapped handlers. Accepted requests carry an
/// [`AuthenticatedUser`] in their extensions.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(AuthenticatedUser(user));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}
