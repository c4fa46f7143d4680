//! # Quill Core
//!
//! Core types, errors, and utilities for the Quill blog API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error types, error classification, and HTTP response rendering
//! - [`query`]: Translation of list query strings into filter, sort, projection, and pagination
//! - [`password`]: Secure password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers for request bodies
//!
//! # Example
//!
//! ```ignore
//! use quill_core::errors::AppError;
//! use quill_core::query::{FilterRequest, QueryTranslator};
//! use quill_core::password::{hash_password, verify_password};
//!
//! // Create an error
//! let error = AppError::not_found(anyhow::anyhow!("No blog found with that ID"));
//!
//! // Hash a password
//! let hash = hash_password("secure_password")?;
//!
//! // Translate a query string
//! let request = FilterRequest::from_pairs([("status", "published"), ("page", "2")]);
//! let plan = QueryTranslator::default().plan(&request)?;
//! ```

pub mod errors;
pub mod password;
pub mod query;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, StoreError};
pub use password::{hash_password, verify_password};
pub use query::{FilterRequest, Pagination, QueryError, QueryPlan, QueryTranslator, ResultPage};
