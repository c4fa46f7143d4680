//! # Quill Blog API
//!
//! A REST API for a blogging application built with Rust, Axum, and MongoDB.
//!
//! ## Overview
//!
//! - **Blogs**: create, read, edit and delete posts; list them with
//!   query-string filtering, range comparisons, sorting, field selection and
//!   pagination
//! - **Authentication**: registration with bcrypt-hashed passwords and JWT
//!   login
//! - **Users**: public profiles; owners update or delete their own account
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Bearer token extractor
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration and login
//! │   ├── blogs/       # Blog posts and list queries
//! │   ├── status/      # Liveness, database status, 404 fallback
//! │   └── users/       # User accounts
//! ├── docs.rs          # OpenAPI document
//! ├── logging.rs       # Tracing subscriber and request logging
//! ├── metrics.rs       # Prometheus metrics
//! ├── router.rs        # Main application router
//! ├── state.rs         # Shared application state
//! └── validator.rs     # Validated JSON extractor
//! ```
//!
//! Each feature module follows the same layout: `controller.rs` (HTTP
//! handlers), `service.rs` (business logic), `model.rs` (documents and DTOs)
//! and `router.rs`.
//!
//! Shared pieces live in workspace crates:
//!
//! - [`quill_config`]: environment-driven configuration
//! - [`quill_core`]: errors, the list query translator, password hashing
//! - [`quill_db`]: the `DocumentStore` trait with MongoDB and in-memory backends
//! - [`quill_auth`]: JWT claims and token utilities
//!
//! ## List Queries
//!
//! `GET /api/blogs` accepts:
//!
//! | Parameter | Example | Effect |
//! |-----------|---------|--------|
//! | any field | `status=published` | equality match |
//! | `field[op]` | `createdAt[gte]=2025-01-01` | `gte`, `gt`, `lte`, `lt` comparison |
//! | `sort` | `title,-createdAt` | sort keys, `-` for descending |
//! | `fields` | `title,status` | projection |
//! | `page`, `limit` | `page=2&limit=10` | pagination, default `1` and `100` |
//!
//! Asking for a page past the end of the results is a 404.
//!
//! ## Environment Variables
//!
//! ```bash
//! APP_ENV=development
//! PORT=3000
//! MONGODB_URI=mongodb://localhost:27017/blogs-db
//! JWT_SECRET=your-secure-secret-key
//! JWT_EXPIRES_IN=86400
//! ```

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use quill_auth;
pub use quill_config;
pub use quill_core;
pub use quill_db;
