//! # Quill Config
//!
//! Configuration types for the Quill blog API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`app`]: Runtime environment and listen address
//! - [`database`]: MongoDB connection settings
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`query`]: Defaults used when translating list query strings
//!
//! # Example
//!
//! ```ignore
//! use quill_config::{AppConfig, CorsConfig, DatabaseConfig, JwtConfig, QueryConfig};
//!
//! // Load all configs from environment
//! let app_config = AppConfig::from_env();
//! let database_config = DatabaseConfig::from_env();
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let query_config = QueryConfig::from_env();
//! ```

pub mod app;
pub mod cors;
pub mod database;
pub mod jwt;
pub mod query;

// Re-export commonly used types at crate root
pub use app::{AppConfig, AppEnv};
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use query::{OperatorScope, QueryConfig};
