//! Database seeding for development and load testing.
//!
//! Seeded documents carry a `seeded` marker so they can be removed without
//! touching real data.

pub mod blogs;
pub mod models;
pub mod users;

use quill_core::hash_password;
use quill_core::query::FilterExpression;
use quill_db::DocumentStore;
use std::time::Instant;

pub use models::{BlogSeed, SeedConfig, UserSeed};

pub const SEED_MARKER: &str = "quill-cli";

/// Seeds users and blog posts.
pub async fn seed_all(
    store: &dyn DocumentStore,
    config: SeedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password(&config.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let users = users::seed_users(store, config.num_users, &password_hash).await?;
    let blogs = blogs::seed_blogs(store, config.num_blogs).await?;

    println!(
        "\n✅ Seeded {} users and {} blog posts in {:?}",
        users,
        blogs,
        start_time.elapsed()
    );
    println!("   Seeded users log in with password: {}", config.password);

    Ok(())
}

/// Removes every seeded document from `collection`.
pub async fn clear_collection(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<u64, Box<dyn std::error::Error>> {
    let seeded = FilterExpression::matching("seeded", SEED_MARKER);
    Ok(store.delete_many(collection, &seeded).await?)
}

/// Clears all seeded data.
pub async fn clear_all(store: &dyn DocumentStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧹 Clearing seeded data...");

    let blogs = clear_collection(store, "blogs").await?;
    let users = clear_collection(store, "users").await?;

    println!("✅ Removed {} blog posts and {} users", blogs, users);
    Ok(())
}
