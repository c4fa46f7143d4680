//! JWT utilities for authentication.
//!
//! Access tokens are HS256-signed and carry the user's id, email and
//! username. There is no refresh flow; clients log in again once a token
//! expires.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use quill_config::JwtConfig;
use quill_core::AppError;

use crate::claims::Claims;

/// Creates an access token for a user.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: &str,
    email: &str,
    username: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.expires_in.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        username: username.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired, or the token is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
