//! Defaults for translating list query strings into store queries.
//!
//! # Environment Variables
//!
//! - `QUERY_DEFAULT_SORT`: Sort applied when the request has none (default: `-createdAt`)
//! - `QUERY_DEFAULT_LIMIT`: Page size when the request has none (default: `100`)
//! - `QUERY_OPERATOR_SCOPE`: `all` or `temporal` (default: `all`)

use std::env;

/// Which fields have their nested comparison operators (`field[gte]=...`) rewritten
/// into store comparison operators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperatorScope {
    /// Every filtered field.
    #[default]
    AllFields,
    /// Only the temporal fields; nested keys elsewhere are matched literally.
    TemporalFields,
}

impl OperatorScope {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "temporal" | "temporal_fields" => OperatorScope::TemporalFields,
            _ => OperatorScope::AllFields,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Sort expression in request syntax, e.g. `-createdAt`
    pub default_sort: String,
    pub default_page: u64,
    pub default_limit: u64,
    /// Fields excluded from results when no explicit projection is requested
    pub hidden_fields: Vec<String>,
    /// Fields whose filter values are parsed as date-times
    pub temporal_fields: Vec<String>,
    pub operator_scope: OperatorScope,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_sort: "-createdAt".to_string(),
            default_page: 1,
            default_limit: 100,
            hidden_fields: vec!["__v".to_string()],
            temporal_fields: vec!["createdAt".to_string(), "updatedAt".to_string()],
            operator_scope: OperatorScope::AllFields,
        }
    }
}

impl QueryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_sort: env::var("QUERY_DEFAULT_SORT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_sort),
            default_limit: env::var("QUERY_DEFAULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit >= 1)
                .unwrap_or(defaults.default_limit),
            operator_scope: env::var("QUERY_OPERATOR_SCOPE")
                .map(|v| OperatorScope::parse(&v))
                .unwrap_or_default(),
            ..defaults
        }
    }

    pub fn is_temporal(&self, field: &str) -> bool {
        self.temporal_fields.iter().any(|f| f == field)
    }
}
