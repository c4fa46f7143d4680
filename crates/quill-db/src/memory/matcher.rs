//! Evaluation of MongoDB query documents against in-memory documents.
//!
//! Covers the subset the API produces: equality (with array membership),
//! embedded document equality, and the `$eq`, `$ne`, `$gt`, `$gte`, `$lt`,
//! `$lte`, `$in`, `$nin` operators. Comparisons follow type bracketing: values
//! of different kinds never satisfy a range operator.

use std::cmp::Ordering;

use mongodb::bson::{Bson, Document};
use quill_core::StoreError;

/// Looks up a possibly dotted path.
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = document.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(nested) => nested.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn matches(document: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (path, condition) in filter {
        if !matches_condition(lookup(document, path), condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(condition: &Document) -> Result<bool, StoreError> {
    let operators = condition.keys().filter(|k| k.starts_with('$')).count();
    if operators > 0 && operators < condition.len() {
        return Err(StoreError::InvalidQuery(format!(
            "cannot mix operators and fields in {condition}"
        )));
    }
    Ok(operators > 0)
}

fn matches_condition(value: Option<&Bson>, condition: &Bson) -> Result<bool, StoreError> {
    if let Bson::Document(ops) = condition
        && is_operator_document(ops)?
    {
        for (op, operand) in ops {
            if !apply_operator(value, op, operand)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    Ok(equals(value, condition))
}

fn apply_operator(value: Option<&Bson>, op: &str, operand: &Bson) -> Result<bool, StoreError> {
    let accepts = |ordering: Ordering| -> bool {
        match op {
            "$gt" => ordering == Ordering::Greater,
            "$gte" => ordering != Ordering::Less,
            "$lt" => ordering == Ordering::Less,
            _ => ordering != Ordering::Greater,
        }
    };

    match op {
        "$eq" => Ok(equals(value, operand)),
        "$ne" => Ok(!equals(value, operand)),
        "$gt" | "$gte" | "$lt" | "$lte" => Ok(candidates(value)
            .into_iter()
            .any(|v| compare_bracketed(v, operand).is_some_and(|o| accepts(o)))),
        "$in" | "$nin" => {
            let Bson::Array(options) = operand else {
                return Err(StoreError::InvalidQuery(format!("{op} needs an array")));
            };
            let found = options.iter().any(|option| equals(value, option));
            Ok(if op == "$in" { found } else { !found })
        }
        other => Err(StoreError::InvalidQuery(format!(
            "unknown operator: {other}"
        ))),
    }
}

/// A value and, for arrays, each of its elements.
fn candidates(value: Option<&Bson>) -> Vec<&Bson> {
    match value {
        Some(Bson::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    }
}

fn equals(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| same(item, expected))
        }
        Some(actual) => same(actual, expected),
    }
}

fn same(a: &Bson, b: &Bson) -> bool {
    compare_bracketed(a, b) == Some(Ordering::Equal)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Rank of each type in the server's cross-type sort order.
fn type_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::MaxKey => 13,
        _ => 12,
    }
}

/// Compares two values of the same type bracket.
fn compare_bracketed(a: &Bson, b: &Bson) -> Option<Ordering> {
    if type_rank(a) != type_rank(b) {
        return None;
    }

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::Null | Bson::Undefined, Bson::Null | Bson::Undefined) => Some(Ordering::Equal),
        (Bson::Array(x), Bson::Array(y)) => compare_sequences(x.iter(), y.iter()),
        (Bson::Document(x), Bson::Document(y)) => {
            if x.len() != y.len() {
                return Some(x.len().cmp(&y.len()));
            }
            for ((kx, vx), (ky, vy)) in x.iter().zip(y.iter()) {
                match kx.cmp(ky) {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
                match total_order(vx, vy) {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => (a == b).then_some(Ordering::Equal),
        },
    }
}

fn compare_sequences<'a>(
    mut x: impl Iterator<Item = &'a Bson>,
    mut y: impl Iterator<Item = &'a Bson>,
) -> Option<Ordering> {
    loop {
        match (x.next(), y.next()) {
            (None, None) => return Some(Ordering::Equal),
            (None, Some(_)) => return Some(Ordering::Less),
            (Some(_), None) => return Some(Ordering::Greater),
            (Some(a), Some(b)) => match total_order(a, b) {
                Ordering::Equal => continue,
                other => return Some(other),
            },
        }
    }
}

/// Total order used for sorting: type rank first, then value.
pub fn total_order(a: &Bson, b: &Bson) -> Ordering {
    type_rank(a)
        .cmp(&type_rank(b))
        .then_with(|| compare_bracketed(a, b).unwrap_or(Ordering::Equal))
}

/// Sort comparison for a possibly missing field. Missing fields sort as null.
pub fn compare_fields(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let null = Bson::Null;
    total_order(a.unwrap_or(&null), b.unwrap_or(&null))
}
