//! Cross-origin settings for browser clients.
//!
//! # Environment Variables
//!
//! - `ALLOWED_ORIGINS`: Comma separated origins allowed to call the API
//!   (default: `http://localhost:3000`, where Swagger UI and Scalar are served)

use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::parse(DEFAULT_ALLOWED_ORIGINS)
    }
}

impl CorsConfig {
    /// Splits a comma separated origin list. Blank entries and trailing
    /// slashes are dropped, since browsers send origins without a path.
    pub fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self { allowed_origins }
    }

    pub fn from_env() -> Self {
        env::var("ALLOWED_ORIGINS")
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }
}
