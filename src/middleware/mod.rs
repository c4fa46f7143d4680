//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: Bearer token authentication
//!
//! Handlers that need an authenticated caller take an [`auth::AuthUser`]
//! argument; the extractor rejects the request with 401 before the handler
//! runs when the token is missing or invalid.

pub mod auth;
