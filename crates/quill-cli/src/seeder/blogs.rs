//! Blog post seeding functionality.

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::*;
use quill_db::DocumentStore;
use quill_db::bson::{DateTime, Document, doc};
use rayon::prelude::*;
use std::time::Instant;

use super::SEED_MARKER;
use super::models::BlogSeed;

const STATUSES: [&str; 3] = ["draft", "published", "archived"];

/// Generates blog posts spread over the past year.
pub fn generate_blogs(count: usize) -> Vec<BlogSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let words: Vec<String> = Words(2..6).fake();
            let mut title = format!("{} {}", words.join(" "), idx);
            title.truncate(50);

            let paragraphs: Vec<String> = Paragraphs(1..4).fake();
            let tags: Vec<String> = Words(1..4).fake();

            BlogSeed {
                title: title.trim().to_string(),
                content: paragraphs.join("\n\n"),
                tags: tags.into_iter().map(|t| t.to_lowercase()).collect(),
                status: STATUSES[idx % STATUSES.len()],
                age_days: (idx % 365) as i64,
            }
        })
        .collect()
}

pub fn blog_document(blog: &BlogSeed) -> Document {
    let created = DateTime::from_millis((Utc::now() - Duration::days(blog.age_days)).timestamp_millis());

    doc! {
        "title": blog.title.as_str(),
        "content": blog.content.as_str(),
        "tags": blog.tags.clone(),
        "status": blog.status,
        "__v": 0,
        "createdAt": created,
        "updatedAt": created,
        "seeded": SEED_MARKER,
    }
}

/// Seeds blog posts into the store
pub async fn seed_blogs(
    store: &dyn DocumentStore,
    count: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📝 Seeding {} blog posts...", count);

    let blogs = generate_blogs(count);
    for blog in &blogs {
        store.insert_one("blogs", blog_document(blog)).await?;
    }

    println!(
        "   ✓ Inserted {} blog posts in {:?}",
        blogs.len(),
        start_time.elapsed()
    );

    Ok(blogs.len())
}
