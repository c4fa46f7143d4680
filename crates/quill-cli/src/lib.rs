//! # Quill CLI
//!
//! Database seeding utilities for Quill testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use quill_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20).with_blogs(200);
//! seed_all(&store, config).await?;
//! ```

pub mod seeder;
