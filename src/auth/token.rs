use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Why a token could not be issued or accepted.
///
/// `Invalid` and `Expired` must both be treated as "unauthenticated" by callers;
/// they stay separate so the rejection can be logged precisely.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed token or signature mismatch.
    #[error("invalid token: {0}")]
    Invalid(String),
    /// Correct signature, but past its expiry.
    #[error("token has expired")]
    Expired,
    /// Encoding failed on our side.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 bearer tokens with a server-held secret.
///
/// The secret is handed over at construction; nothing here reads the environment.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issues a token for `user_id`, valid for seven days from now.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token for `user_id` as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = issued_at + Duration::days(TOKEN_LIFETIME_DAYS);
        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Checks signature and expiry, returning the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
