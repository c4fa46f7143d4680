//! Structured filter expressions.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quill_config::{OperatorScope, QueryConfig};

use super::QueryError;
use super::request::{FilterRequest, ParamValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparisonOperator {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 4] = [Self::Gte, Self::Gt, Self::Lte, Self::Lt];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "gte" => Some(Self::Gte),
            "gt" => Some(Self::Gt),
            "lte" => Some(Self::Lte),
            "lt" => Some(Self::Lt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gte => "gte",
            Self::Gt => "gt",
            Self::Lte => "lte",
            Self::Lt => "lt",
        }
    }
}

/// Key inside a nested filter mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorKey {
    Comparison(ComparisonOperator),
    /// Anything else; passed to the store exactly as written.
    Literal(String),
}

impl OperatorKey {
    pub fn name(&self) -> &str {
        match self {
            Self::Comparison(op) => op.as_str(),
            Self::Literal(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    List(Vec<FilterValue>),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTerm {
    pub operator: OperatorKey,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    /// Field equals the value, or for lists, matches any contained value.
    Equality(FilterValue),
    /// All terms must hold. A range made only of literal keys matches an
    /// embedded document.
    Range(Vec<RangeTerm>),
}

/// Conjunction of per-field conditions. An empty expression matches every
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    fields: BTreeMap<String, FieldFilter>,
}

impl FilterExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, filter: FieldFilter) {
        self.fields.insert(field.into(), filter);
    }

    pub fn with(mut self, field: impl Into<String>, filter: FieldFilter) -> Self {
        self.insert(field, filter);
        self
    }

    /// Equality filter on a text value, used for lookups by key.
    pub fn matching(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with(field, FieldFilter::Equality(FilterValue::Text(value.into())))
    }

    pub fn get(&self, field: &str) -> Option<&FieldFilter> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldFilter)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parses a date-time in one of the accepted forms: RFC 3339,
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` taken as UTC, or `YYYY-MM-DD` at UTC
/// midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn field_value(field: &str, raw: &str, temporal: bool) -> Result<FilterValue, QueryError> {
    if !temporal {
        return Ok(FilterValue::Text(raw.to_string()));
    }

    parse_timestamp(raw)
        .map(FilterValue::Timestamp)
        .ok_or_else(|| QueryError::MalformedFilter {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

fn operator_key(name: &str, rewrite: bool) -> OperatorKey {
    match ComparisonOperator::parse(name) {
        Some(op) if rewrite => OperatorKey::Comparison(op),
        _ => OperatorKey::Literal(name.to_string()),
    }
}

pub(crate) fn build_filter(
    request: &FilterRequest,
    config: &QueryConfig,
) -> Result<FilterExpression, QueryError> {
    let mut expression = FilterExpression::new();

    for (field, param) in request.filter_params() {
        if field.starts_with('$') {
            return Err(QueryError::OperatorField {
                field: field.to_string(),
            });
        }

        let temporal = config.is_temporal(field);

        let filter = match param {
            ParamValue::Scalar(raw) => FieldFilter::Equality(field_value(field, raw, temporal)?),
            ParamValue::List(raws) => {
                let values = raws
                    .iter()
                    .map(|raw| field_value(field, raw, temporal))
                    .collect::<Result<Vec<_>, _>>()?;
                FieldFilter::Equality(FilterValue::List(values))
            }
            ParamValue::Nested(ops) => {
                let rewrite = match config.operator_scope {
                    OperatorScope::AllFields => true,
                    OperatorScope::TemporalFields => temporal,
                };
                let terms = ops
                    .iter()
                    .map(|(name, raw)| {
                        Ok(RangeTerm {
                            operator: operator_key(name, rewrite),
                            value: field_value(field, raw, temporal)?,
                        })
                    })
                    .collect::<Result<Vec<_>, QueryError>>()?;
                FieldFilter::Range(terms)
            }
        };

        expression.insert(field.clone(), filter);
    }

    Ok(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_forms() {
        let midnight = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("2025-01-01T00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-01-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2025-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(
            parse_timestamp("2025-01-01T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(
            parse_timestamp("2025-01-01T10:30:15.250"),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 30, 15).unwrap()
                + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2025-13-01"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_operator_parse() {
        for op in ComparisonOperator::ALL {
            assert_eq!(ComparisonOperator::parse(op.as_str()), Some(op));
        }
        assert_eq!(ComparisonOperator::parse("ne"), None);
        assert_eq!(ComparisonOperator::parse("GTE"), None);
    }

    #[test]
    fn test_literal_keys_keep_their_name() {
        assert_eq!(operator_key("in", true).name(), "in");
        assert_eq!(operator_key("gt", false), OperatorKey::Literal("gt".into()));
        assert_eq!(
            operator_key("gt", true),
            OperatorKey::Comparison(ComparisonOperator::Gt)
        );
    }
}
