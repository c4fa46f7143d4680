//! Rendering of query plans into MongoDB query documents.

use mongodb::bson::{Bson, DateTime, Document, doc};
use quill_core::StoreError;
use quill_core::query::{
    FieldFilter, FieldProjection, FilterExpression, FilterValue, OperatorKey, SortDirection,
    SortSpec,
};

use crate::json::parse_object_id;

const ID_FIELD: &str = "_id";

fn render_value(field: &str, value: &FilterValue) -> Result<Bson, StoreError> {
    Ok(match value {
        FilterValue::Text(text) if field == ID_FIELD => Bson::ObjectId(parse_object_id(text)?),
        FilterValue::Text(text) => Bson::String(text.clone()),
        FilterValue::Timestamp(ts) => Bson::DateTime(DateTime::from_millis(ts.timestamp_millis())),
        FilterValue::List(values) => Bson::Array(
            values
                .iter()
                .map(|v| render_value(field, v))
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Comparison operators render as `$gte`, `$gt`, `$lte`, `$lt`; literal keys
/// are kept exactly as given.
fn render_key(operator: &OperatorKey) -> String {
    match operator {
        OperatorKey::Comparison(op) => format!("${}", op.as_str()),
        OperatorKey::Literal(name) => name.clone(),
    }
}

pub fn filter_document(filter: &FilterExpression) -> Result<Document, StoreError> {
    let mut document = Document::new();

    for (field, condition) in filter.iter() {
        let rendered = match condition {
            FieldFilter::Equality(FilterValue::List(values)) => {
                let values = values
                    .iter()
                    .map(|v| render_value(field, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Bson::Document(doc! { "$in": values })
            }
            FieldFilter::Equality(value) => render_value(field, value)?,
            FieldFilter::Range(terms) => {
                let mut ops = Document::new();
                for term in terms {
                    ops.insert(render_key(&term.operator), render_value(field, &term.value)?);
                }
                Bson::Document(ops)
            }
        };
        document.insert(field.clone(), rendered);
    }

    Ok(document)
}

pub fn sort_document(sort: &SortSpec) -> Document {
    sort.keys()
        .iter()
        .map(|key| {
            let direction = match key.direction {
                SortDirection::Ascending => 1,
                SortDirection::Descending => -1,
            };
            (key.field.clone(), Bson::Int32(direction))
        })
        .collect()
}

pub fn projection_document(projection: &FieldProjection) -> Document {
    projection
        .fields()
        .iter()
        .map(|f| (f.field.clone(), Bson::Int32(i32::from(f.included))))
        .collect()
}
