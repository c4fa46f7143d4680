use async_trait::async_trait;
use mongodb::bson::Document;
use quill_core::StoreError;
use quill_core::query::{FieldProjection, FilterExpression, QueryPlan, SortSpec};

/// Shaping applied to a `find`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: SortSpec,
    pub projection: FieldProjection,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl From<&QueryPlan> for FindOptions {
    fn from(plan: &QueryPlan) -> Self {
        Self {
            sort: plan.sort.clone(),
            projection: plan.projection.clone(),
            skip: plan.pagination.skip,
            limit: Some(plan.pagination.limit),
        }
    }
}

/// Persistence contract shared by every backend.
///
/// Filters are structured expressions; each backend renders them into its
/// own query language. Values of the `_id` field are parsed as object ids and
/// rejected with [`StoreError::InvalidId`] when malformed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: &str,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError>;

    async fn count(&self, collection: &str, filter: &FilterExpression) -> Result<u64, StoreError>;

    /// Inserts a document, assigning an `_id` when absent, and returns the
    /// stored document.
    async fn insert_one(&self, collection: &str, document: Document)
    -> Result<Document, StoreError>;

    /// Sets the given fields on the first matching document and returns the
    /// updated document.
    async fn update_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
        changes: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Removes the first matching document and returns it.
    async fn delete_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError>;

    /// Removes every matching document and returns how many were removed.
    async fn delete_many(&self, collection: &str, filter: &FilterExpression)
    -> Result<u64, StoreError>;

    /// Enforces unique values for `field` within the collection.
    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError>;

    /// Checks connectivity and returns the database name.
    async fn ping(&self) -> Result<String, StoreError>;
}
