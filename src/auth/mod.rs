pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserSummary;

// Re-export necessary items
pub use credentials::CredentialStore;
pub use extractors::AuthenticatedUser;
pub use middleware::{AuthMiddleware, GateError};
pub use password::{HashError, PasswordHasher};
pub use token::{Claims, TokenError, TokenService};

/// Represents the payload for a user login request.
///
/// Fields default to empty so a missing field is reported as a validation
/// failure rather than a body parse error.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing fields"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing fields"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing fields"))]
    pub name: String,
    /// Must be a valid email format once trimmed.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing fields"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing fields"))]
    pub password: String,
}

impl SignupRequest {
    /// Runs the derived field rules plus an email format check on the trimmed address.
    pub fn check(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        if !validator::validate_email(self.email.trim()) {
            let mut errors = validator::ValidationErrors::new();
            let mut error = validator::ValidationError::new("email");
            error.message = Some("Invalid email address".into());
            errors.add("email", error);
            return Err(errors);
        }
        Ok(())
    }
}

/// Response after a successful signup or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    pub user: UserSummary,
}
