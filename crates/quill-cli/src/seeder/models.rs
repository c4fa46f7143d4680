//! Data models for database seeding configuration.

/// Seed data for creating a user.
pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Seed data for creating a blog post.
pub struct BlogSeed {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub status: &'static str,
    /// Days before now the post was created
    pub age_days: i64,
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub num_users: usize,
    pub num_blogs: usize,
    /// Plain-text password shared by every seeded user
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_users: 10,
            num_blogs: 50,
            password: "password123".to_string(),
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of users.
    pub fn new(num_users: usize) -> Self {
        Self {
            num_users,
            ..Default::default()
        }
    }

    /// Sets the number of blog posts.
    pub fn with_blogs(mut self, num_blogs: usize) -> Self {
        self.num_blogs = num_blogs;
        self
    }

    /// Sets the password shared by seeded users.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}
