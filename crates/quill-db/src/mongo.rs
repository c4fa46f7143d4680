//! MongoDB storage backend using the official async driver.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use quill_config::DatabaseConfig;
use quill_core::StoreError;
use quill_core::query::FilterExpression;
use tracing::{info, instrument};

use crate::render::{filter_document, projection_document, sort_document};
use crate::store::{DocumentStore, FindOptions};

const DUPLICATE_KEY: i32 = 11000;

/// Server error codes for queries the server refuses to run: bad values,
/// unknown operators and invalid projections.
const INVALID_QUERY_CODES: [i32; 5] = [2, 9, 31253, 31254, 17287];

#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Connects using the configured URI and selects the configured database.
    /// The driver connects lazily; call [`DocumentStore::ping`] to verify.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(&config.uri).await.map_err(map_error)?;
        let client = Client::with_options(options).map_err(map_error)?;
        info!(database = %config.database, "MongoDB client initialized");
        Ok(Self::new(client.database(&config.database)))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

/// Extracts the field and the quoted value from a duplicate key message such
/// as `E11000 ... dup key: { email: "ada@example.com" }`.
fn parse_duplicate(message: &str) -> StoreError {
    let field = message
        .split_once("dup key: {")
        .and_then(|(_, rest)| rest.split_once(':'))
        .map(|(field, _)| field.trim().to_string())
        .unwrap_or_default();

    let value = message
        .split_once("dup key: {")
        .and_then(|(_, rest)| rest.split_once(':'))
        .map(|(_, rest)| rest.trim().trim_end_matches('}').trim())
        .map(|v| v.trim_matches('"').to_string())
        .unwrap_or_default();

    StoreError::DuplicateKey { field, value }
}

pub(crate) fn map_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            parse_duplicate(&e.message)
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => parse_duplicate(&e.message),
        ErrorKind::Command(e) if INVALID_QUERY_CODES.contains(&e.code) => {
            StoreError::InvalidQuery(e.message.clone())
        }
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::backend(err),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self, filter, options))]
    async fn find(
        &self,
        collection: &str,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let coll = self.collection(collection);
        let mut query = coll.find(filter_document(filter)?).skip(options.skip);

        if !options.sort.is_empty() {
            query = query.sort(sort_document(&options.sort));
        }
        if !options.projection.is_empty() {
            query = query.projection(projection_document(&options.projection));
        }
        if let Some(limit) = options.limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = query.await.map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }

    #[instrument(skip(self, filter))]
    async fn find_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(filter_document(filter)?)
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self, filter))]
    async fn count(&self, collection: &str, filter: &FilterExpression) -> Result<u64, StoreError> {
        self.collection(collection)
            .count_documents(filter_document(filter)?)
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<Document, StoreError> {
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }

        self.collection(collection)
            .insert_one(&document)
            .await
            .map_err(map_error)?;

        Ok(document)
    }

    #[instrument(skip(self, filter, changes))]
    async fn update_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one_and_update(filter_document(filter)?, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self, filter))]
    async fn delete_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one_and_delete(filter_document(filter)?)
            .await
            .map_err(map_error)
    }

    #[instrument(skip(self, filter))]
    async fn delete_many(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_many(filter_document(filter)?)
            .await
            .map_err(map_error)?;

        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection(collection)
            .create_index(index)
            .await
            .map_err(map_error)?;

        info!(collection, field, "Unique index ensured");
        Ok(())
    }

    async fn ping(&self) -> Result<String, StoreError> {
        let reply = self
            .database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_error)?;

        match reply.get("ok") {
            Some(Bson::Double(ok)) if *ok >= 1.0 => Ok(self.database.name().to_string()),
            Some(Bson::Int32(1)) | Some(Bson::Int64(1)) => Ok(self.database.name().to_string()),
            _ => Err(StoreError::Unavailable(format!("ping failed: {reply}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::query::{FilterRequest, QueryTranslator};

    #[test]
    fn test_parse_duplicate_message() {
        let err = parse_duplicate(
            r#"E11000 duplicate key error collection: blogs-db.users index: email_1 dup key: { email: "ada@example.com" }"#,
        );
        match err {
            StoreError::DuplicateKey { field, value } => {
                assert_eq!(field, "email");
                assert_eq!(value, "ada@example.com");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_duplicate_without_key_details() {
        let err = parse_duplicate("E11000 duplicate key error");
        assert!(matches!(
            err,
            StoreError::DuplicateKey { ref field, ref value } if field.is_empty() && value.is_empty()
        ));
    }

    /// Needs a reachable server: `MONGODB_URI=... cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_find_with_plan_against_live_server() {
        let config = DatabaseConfig {
            database: format!("quill-test-{}", ObjectId::new().to_hex()),
            ..DatabaseConfig::from_env()
        };
        let store = MongoStore::connect(&config).await.unwrap();
        store.ping().await.unwrap();

        for (title, status) in [
            ("Alpha post", "published"),
            ("Bravo post", "draft"),
            ("Charlie post", "published"),
        ] {
            store
                .insert_one("blogs", doc! { "title": title, "status": status, "__v": 0 })
                .await
                .unwrap();
        }

        let plan = QueryTranslator::default()
            .plan(&FilterRequest::from_pairs([
                ("status", "published"),
                ("sort", "-title"),
                ("fields", "title"),
                ("limit", "1"),
            ]))
            .unwrap();

        let found = store
            .find("blogs", &plan.filter, FindOptions::from(&plan))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("title").unwrap(), "Charlie post");
        assert!(found[0].get("status").is_none());

        let removed = store
            .delete_many("blogs", &FilterExpression::new())
            .await
            .unwrap();
        assert_eq!(removed, 3);

        store.database().drop().await.unwrap();
    }
}
