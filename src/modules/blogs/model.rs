use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use quill_core::ResultPage;
use quill_core::serde::{deserialize_optional_trimmed, deserialize_tags, deserialize_trimmed};
use quill_db::bson::{self, Document, doc};
use quill_db::document_to_json;

pub const BLOGS_COLLECTION: &str = "blogs";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
            BlogStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[schema(example = "60d0fe4f5311236168a109ca")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: BlogStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(document_to_json(document))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBlogDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(
        min = 5,
        max = 50,
        message = "Title must be between 5 and 50 characters long"
    ))]
    pub title: String,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 10, message = "Content must be at least 10 characters long"))]
    pub content: String,
    /// Stored trimmed and lowercased
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Option<Vec<String>>,
    /// Defaults to `draft`
    #[serde(default)]
    pub status: Option<BlogStatus>,
}

impl CreateBlogDto {
    pub fn into_document(self, now: bson::DateTime) -> Document {
        doc! {
            "title": self.title,
            "content": self.content,
            "tags": self.tags.unwrap_or_default(),
            "status": self.status.unwrap_or_default().as_str(),
            "createdAt": now,
            "updatedAt": now,
            "__v": 0,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBlogDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(
        min = 5,
        max = 50,
        message = "Title must be between 5 and 50 characters long"
    ))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 10, message = "Content must be at least 10 characters long"))]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<BlogStatus>,
}

impl UpdateBlogDto {
    /// Fields to `$set`, always including a fresh `updatedAt`.
    pub fn into_changes(self, now: bson::DateTime) -> Document {
        let mut changes = Document::new();
        if let Some(title) = self.title {
            changes.insert("title", title);
        }
        if let Some(content) = self.content {
            changes.insert("content", content);
        }
        if let Some(tags) = self.tags {
            changes.insert("tags", tags);
        }
        if let Some(status) = self.status {
            changes.insert("status", status.as_str());
        }
        changes.insert("updatedAt", now);
        changes
    }
}

/// Query parameters accepted by `GET /api/blogs`.
///
/// Any other parameter filters on the field of the same name. Bracketed keys
/// compare: `createdAt[gte]=2025-01-01`, `createdAt[lt]=2025-02-01`.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogListParams {
    /// 1-based page number; requesting a page past the last one is a 404
    pub page: Option<u64>,
    /// Page size (default 100)
    pub limit: Option<u64>,
    /// Comma separated fields, `-` prefix for descending (default `-createdAt`)
    pub sort: Option<String>,
    /// Comma separated fields to return
    pub fields: Option<String>,
    pub status: Option<BlogStatus>,
    pub tags: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogData {
    pub blog: Blog,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogResponse {
    #[schema(example = "success")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: BlogData,
}

impl BlogResponse {
    pub fn new(blog: Blog) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: BlogData { blog },
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_count: u64,
    pub total_pages: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogListData {
    /// Blogs shaped by the requested projection
    #[schema(value_type = Vec<Object>)]
    pub blogs: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogListResponse {
    #[schema(example = "success")]
    pub status: String,
    /// Number of blogs in this page
    pub results: usize,
    pub pagination: PaginationMeta,
    pub data: BlogListData,
}

impl From<ResultPage<Value>> for BlogListResponse {
    fn from(page: ResultPage<Value>) -> Self {
        Self {
            status: "success".to_string(),
            results: page.items.len(),
            pagination: PaginationMeta {
                total_count: page.total_count,
                total_pages: page.total_pages,
                page: page.page,
                limit: page.limit,
            },
            data: BlogListData { blogs: page.items },
        }
    }
}
