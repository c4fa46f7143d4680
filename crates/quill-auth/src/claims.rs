use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// - `sub`: User ID (hex object id)
/// - `email`, `username`: identity of the token holder at issue time
/// - `exp`, `iat`: expiry and issued-at Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub username: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
