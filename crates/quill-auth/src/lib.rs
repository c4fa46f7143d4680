//! # Quill Auth
//!
//! Authentication types and JWT utilities for the Quill blog API.
//!
//! This crate provides:
//!
//! - [`claims`]: JWT claim structure carried by access tokens
//! - [`jwt`]: Token creation and verification utilities
//!
//! # Example
//!
//! ```ignore
//! use quill_auth::{create_access_token, verify_token};
//! use quill_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! // Create an access token
//! let token = create_access_token(&user_id, "ada@example.com", "adalovelace", &config)?;
//!
//! // Verify the token
//! let claims = verify_token(&token, &config)?;
//! println!("User ID: {}", claims.sub);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
