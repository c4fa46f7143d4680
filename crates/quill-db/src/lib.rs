//! # Quill DB
//!
//! Document persistence for the Quill blog API.
//!
//! Storage is reached through the [`DocumentStore`] trait so handlers never
//! depend on a concrete backend:
//!
//! - [`MongoStore`]: MongoDB via the official async driver
//! - [`MemoryStore`]: an in-process store used by tests and local tooling
//!
//! Query plans built by `quill_core::query` are rendered into MongoDB query
//! documents by the [`render`] module; both backends evaluate the same
//! rendered documents.
//!
//! # Example
//!
//! ```ignore
//! use quill_config::DatabaseConfig;
//! use quill_db::{DocumentStore, MongoStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quill_core::StoreError> {
//!     let store = MongoStore::connect(&DatabaseConfig::from_env()).await?;
//!     store.ensure_unique("users", "email").await?;
//!     let name = store.ping().await?;
//!     println!("connected to {name}");
//!     Ok(())
//! }
//! ```

pub mod json;
pub mod memory;
pub mod mongo;
pub mod render;
pub mod store;

pub use json::{document_to_json, parse_object_id};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{DocumentStore, FindOptions};

// Re-export bson for callers building documents
pub use mongodb::bson;
