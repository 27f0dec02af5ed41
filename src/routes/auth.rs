use crate::{
    auth::{AuthResponse, LoginRequest, SignupRequest},
    error::AppError,
    models::UserSummary,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{token, user: {id, name, email}}`.
/// - `400 Bad Request`: missing fields, malformed email, or email already registered.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.check()?;

    let user = state
        .credentials
        .create(&signup_data.name, &signup_data.email, &signup_data.password)
        .await?;
    let token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown email and
/// wrong password produce the same response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .credentials
        .authenticate(&login_data.email, &login_data.password)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid credentials".into()))?;
    let token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserSummary::from(&user),
    }))
}
