//! Conversion between stored documents and API JSON.

use mongodb::bson::{Bson, Document, oid::ObjectId};
use quill_core::StoreError;
use serde_json::{Map, Value};

pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Converts a stored document into API JSON: `_id` becomes a hex `id`, dates
/// become RFC 3339 strings.
pub fn document_to_json(mut document: Document) -> Value {
    let mut object = Map::new();

    if let Some(id) = document.remove("_id") {
        object.insert("id".to_string(), bson_to_json(id));
    }
    for (key, value) in document {
        object.insert(key, bson_to_json(value));
    }

    Value::Object(object)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(n) => Value::from(n),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(nested) => Value::Object(
            nested
                .into_iter()
                .map(|(k, v)| (k, bson_to_json(v)))
                .collect(),
        ),
        other => other.into_relaxed_extjson(),
    }
}
