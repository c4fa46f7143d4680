//! User seeding functionality.

use fake::Fake;
use fake::faker::name::en::*;
use quill_db::DocumentStore;
use quill_db::bson::{Document, doc};
use rayon::prelude::*;
use std::time::Instant;

use super::SEED_MARKER;
use super::models::UserSeed;

/// Generates users with unique usernames and emails.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(idx, password_hash))
        .collect()
}

fn generate_user(idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let handle: String = format!("{}{}", first_name, last_name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();

    UserSeed {
        username: format!("{}{:04}", handle, idx),
        email: format!(
            "{}.{}+seed{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            idx
        )
        .replace(char::is_whitespace, ""),
        first_name,
        last_name,
        password_hash: password_hash.to_string(),
    }
}

pub fn user_document(user: &UserSeed) -> Document {
    doc! {
        "firstName": user.first_name.as_str(),
        "lastName": user.last_name.as_str(),
        "username": user.username.as_str(),
        "email": user.email.as_str(),
        "password": user.password_hash.as_str(),
        "blogsPosted": 0,
        "__v": 0,
        "seeded": SEED_MARKER,
    }
}

/// Seeds users into the store
pub async fn seed_users(
    store: &dyn DocumentStore,
    count: usize,
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);
    for user in &users {
        store.insert_one("users", user_document(user)).await?;
    }

    println!(
        "   ✓ Inserted {} users in {:?}",
        users.len(),
        start_time.elapsed()
    );

    Ok(users.len())
}
