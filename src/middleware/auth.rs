use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use quill_auth::{Claims, verify_token};
use quill_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Hex object id of the authenticated user.
    pub fn user_id(&self) -> &str {
        &self.0.sub
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Rejects with 403 unless the caller owns the account `user_id`.
    pub fn ensure_owner(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id() != user_id.trim() {
            return Err(AppError::forbidden(
                "You can only modify your own account".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token.trim(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
