//! Runtime environment and listener configuration.
//!
//! # Environment Variables
//!
//! - `APP_ENV`: `development` or `production` (default: `development`)
//! - `HOST`: Interface to bind (default: `0.0.0.0`)
//! - `PORT`: Port to listen on (default: `3000`)

use std::env;
use std::fmt;

/// Deployment environment the server runs in.
///
/// Controls how much error detail is exposed to clients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
}

impl AppEnv {
    /// Parses an environment name, falling back to development for unknown values.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => AppEnv::Production,
            _ => AppEnv::Development,
        }
    }

    pub fn from_env() -> Self {
        env::var("APP_ENV")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Development => write!(f, "development"),
            AppEnv::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub env: AppEnv,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: AppEnv::Development,
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            env: AppEnv::from_env(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_env_parse_production() {
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse("PROD"), AppEnv::Production);
    }

    #[test]
    fn test_app_env_parse_unknown_defaults_to_development() {
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
        assert_eq!(AppEnv::parse(""), AppEnv::Development);
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig {
            port: 8080,
            ..AppConfig::default()
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
