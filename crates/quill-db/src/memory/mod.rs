//! In-process document store.
//!
//! Evaluates the same rendered query documents as the MongoDB backend, so
//! handlers and query plans can be exercised without a running server.

mod matcher;

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use quill_core::StoreError;
use quill_core::query::FilterExpression;

use crate::render::{filter_document, projection_document, sort_document};
use crate::store::{DocumentStore, FindOptions};

pub use matcher::matches;
use matcher::{compare_fields, lookup};

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    unique_fields: HashSet<String>,
}

impl Collection {
    fn position(&self, filter: &Document) -> Result<Option<usize>, StoreError> {
        for (index, document) in self.documents.iter().enumerate() {
            if matches(document, filter)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Fails when `candidate` repeats a unique value held by another document.
    fn check_unique(&self, candidate: &Document, skip: Option<usize>) -> Result<(), StoreError> {
        for field in &self.unique_fields {
            let Some(value) = lookup(candidate, field) else {
                continue;
            };
            let clash = self
                .documents
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip)
                .any(|(_, other)| lookup(other, field) == Some(value));
            if clash {
                return Err(StoreError::DuplicateKey {
                    field: field.clone(),
                    value: display_value(value),
                });
            }
        }
        Ok(())
    }
}

fn display_value(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn lock_error<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Applies an inclusion or exclusion projection. `_id` is kept unless
/// excluded explicitly.
fn project(document: Document, projection: &Document) -> Result<Document, StoreError> {
    if projection.is_empty() {
        return Ok(document);
    }

    let mut keep_id = true;
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    for (field, flag) in projection {
        let on = matches!(flag, Bson::Int32(1) | Bson::Int64(1) | Bson::Boolean(true));
        if field == "_id" {
            keep_id = on;
        } else if on {
            included.push(field.as_str());
        } else {
            excluded.push(field.as_str());
        }
    }

    if !included.is_empty() && !excluded.is_empty() {
        return Err(StoreError::InvalidQuery(format!(
            "Cannot do exclusion on field {} in inclusion projection",
            excluded[0]
        )));
    }

    let projected = document
        .into_iter()
        .filter(|(field, _)| {
            if field == "_id" {
                keep_id
            } else if included.is_empty() {
                !excluded.contains(&field.as_str())
            } else {
                included.contains(&field.as_str())
            }
        })
        .collect();

    Ok(projected)
}

#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    collections: RwLock<HashMap<String, Collection>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of documents in a collection, regardless of filters.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, |c| c.documents.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let filter = filter_document(filter)?;
        let sort = sort_document(&options.sort);
        let projection = projection_document(&options.projection);

        let collections = self.collections.read().map_err(lock_error)?;
        let Some(source) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut selected = Vec::new();
        for document in &source.documents {
            if matches(document, &filter)? {
                selected.push(document.clone());
            }
        }
        drop(collections);

        if !sort.is_empty() {
            selected.sort_by(|a, b| {
                for (field, direction) in &sort {
                    let ordering = compare_fields(lookup(a, field), lookup(b, field));
                    let ordering = match direction {
                        Bson::Int32(d) if *d < 0 => ordering.reverse(),
                        _ => ordering,
                    };
                    if ordering.is_ne() {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(usize::MAX);
        let limit = options
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        selected
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| project(document, &projection))
            .collect()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError> {
        let filter = filter_document(filter)?;
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(source) = collections.get(collection) else {
            return Ok(None);
        };

        Ok(source
            .position(&filter)?
            .map(|index| source.documents[index].clone()))
    }

    async fn count(&self, collection: &str, filter: &FilterExpression) -> Result<u64, StoreError> {
        let filter = filter_document(filter)?;
        let collections = self.collections.read().map_err(lock_error)?;
        let Some(source) = collections.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for document in &source.documents {
            if matches(document, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<Document, StoreError> {
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }

        let mut collections = self.collections.write().map_err(lock_error)?;
        let target = collections.entry(collection.to_string()).or_default();
        target.check_unique(&document, None)?;
        target.documents.push(document.clone());

        Ok(document)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let filter = filter_document(filter)?;
        let mut collections = self.collections.write().map_err(lock_error)?;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = target.position(&filter)? else {
            return Ok(None);
        };

        let mut updated = target.documents[index].clone();
        for (field, value) in changes {
            updated.insert(field, value);
        }
        target.check_unique(&updated, Some(index))?;
        target.documents[index] = updated.clone();

        Ok(Some(updated))
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<Option<Document>, StoreError> {
        let filter = filter_document(filter)?;
        let mut collections = self.collections.write().map_err(lock_error)?;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(None);
        };

        Ok(target
            .position(&filter)?
            .map(|index| target.documents.remove(index)))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &FilterExpression,
    ) -> Result<u64, StoreError> {
        let filter = filter_document(filter)?;
        let mut collections = self.collections.write().map_err(lock_error)?;
        let Some(target) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let doomed = target
            .documents
            .iter()
            .map(|document| matches(document, &filter))
            .collect::<Result<Vec<bool>, _>>()?;

        let mut flags = doomed.iter();
        target
            .documents
            .retain(|_| !flags.next().copied().unwrap_or(false));

        Ok(doomed.iter().filter(|d| **d).count() as u64)
    }

    async fn ensure_unique(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(lock_error)?;
        let target = collections.entry(collection.to_string()).or_default();

        let mut seen = Vec::new();
        for document in &target.documents {
            if let Some(value) = lookup(document, field) {
                if seen.contains(&value) {
                    return Err(StoreError::DuplicateKey {
                        field: field.to_string(),
                        value: display_value(value),
                    });
                }
                seen.push(value);
            }
        }

        target.unique_fields.insert(field.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<String, StoreError> {
        Ok(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{DateTime, doc};
    use quill_core::query::{FilterRequest, QueryTranslator};

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new("test-db");
        for (i, (title, status)) in [
            ("Alpha post", "published"),
            ("Bravo post", "draft"),
            ("Charlie post", "published"),
            ("Delta post", "archived"),
            ("Echo post", "published"),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .insert_one(
                    "blogs",
                    doc! {
                        "title": title,
                        "status": status,
                        "__v": 0,
                        "createdAt": DateTime::from_millis(i as i64 * 1_000),
                    },
                )
                .await
                .unwrap();
        }
        store
    }

    fn plan(pairs: &[(&str, &str)]) -> quill_core::QueryPlan {
        QueryTranslator::default()
            .plan(&FilterRequest::from_pairs(pairs.iter().copied()))
            .unwrap()
    }

    fn titles(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|d| d.get_str("title").unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_find_sorts_and_paginates() {
        let store = seeded().await;
        let plan = plan(&[("sort", "title"), ("page", "2"), ("limit", "2")]);

        let documents = store
            .find("blogs", &plan.filter, FindOptions::from(&plan))
            .await
            .unwrap();
        assert_eq!(titles(&documents), vec!["Charlie post", "Delta post"]);
    }

    #[tokio::test]
    async fn test_default_plan_hides_version_and_sorts_newest_first() {
        let store = seeded().await;
        let plan = plan(&[]);

        let documents = store
            .find("blogs", &plan.filter, FindOptions::from(&plan))
            .await
            .unwrap();
        assert_eq!(documents.len(), 5);
        assert_eq!(documents[0].get_str("title").unwrap(), "Echo post");
        assert!(documents.iter().all(|d| !d.contains_key("__v")));
        assert!(documents.iter().all(|d| d.contains_key("_id")));
    }

    #[tokio::test]
    async fn test_filter_and_count() {
        let store = seeded().await;
        let plan = plan(&[("status", "published"), ("createdAt[gte]", "1970-01-01T00:00:01Z")]);

        let count = store.count("blogs", &plan.filter).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_inclusion_projection() {
        let store = seeded().await;
        let plan = plan(&[("fields", "title")]);

        let documents = store
            .find("blogs", &plan.filter, FindOptions::from(&plan))
            .await
            .unwrap();
        for document in documents {
            let mut keys: Vec<_> = document.keys().map(String::as_str).collect();
            keys.sort();
            assert_eq!(keys, vec!["_id", "title"]);
        }
    }

    #[tokio::test]
    async fn test_mixed_projection_is_rejected() {
        let store = seeded().await;
        let plan = plan(&[("fields", "title,-status")]);

        let err = store
            .find("blogs", &plan.filter, FindOptions::from(&plan))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_by_id() {
        let store = seeded().await;
        let first = store
            .find_one("blogs", &FilterExpression::new())
            .await
            .unwrap()
            .unwrap();
        let id = first.get_object_id("_id").unwrap().to_hex();
        let by_id = FilterExpression::matching("_id", id.clone());

        let updated = store
            .update_one("blogs", &by_id, doc! { "status": "archived" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get_str("status").unwrap(), "archived");
        assert_eq!(updated.get_str("title").unwrap(), "Alpha post");

        let deleted = store.delete_one("blogs", &by_id).await.unwrap();
        assert!(deleted.is_some());
        assert_eq!(store.len("blogs"), 4);
        assert!(store.find_one("blogs", &by_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_many_removes_all_matches() {
        let store = seeded().await;

        let published = FilterExpression::matching("status", "published");
        assert_eq!(store.delete_many("blogs", &published).await.unwrap(), 3);
        assert_eq!(store.len("blogs"), 2);
        assert_eq!(store.count("blogs", &published).await.unwrap(), 0);

        assert_eq!(store.delete_many("blogs", &published).await.unwrap(), 0);
        assert_eq!(store.delete_many("missing", &published).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unique_fields() {
        let store = MemoryStore::default();
        store.ensure_unique("users", "email").await.unwrap();
        store
            .insert_one("users", doc! { "email": "ada@example.com" })
            .await
            .unwrap();

        let err = store
            .insert_one("users", doc! { "email": "ada@example.com" })
            .await
            .unwrap_err();
        match err {
            StoreError::DuplicateKey { field, value } => {
                assert_eq!(field, "email");
                assert_eq!(value, "ada@example.com");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_id_filter() {
        let store = seeded().await;
        let err = store
            .find_one("blogs", &FilterExpression::matching("_id", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)));
    }
}
