//! List query translation.
//!
//! [`QueryTranslator`] turns the raw parameters of a list request into a
//! [`QueryPlan`]: a filter expression, a sort specification, a field
//! projection and pagination settings. Translation is pure; the plan is
//! rendered into store-specific documents by the persistence layer.
//!
//! # Example
//!
//! ```ignore
//! use quill_core::query::{FilterRequest, QueryTranslator};
//!
//! let request = FilterRequest::from_pairs([
//!     ("createdAt[gte]", "2025-01-01"),
//!     ("sort", "title,-createdAt"),
//!     ("page", "2"),
//!     ("limit", "10"),
//! ]);
//!
//! let translator = QueryTranslator::default();
//! let plan = translator.plan(&request)?;
//! assert_eq!(plan.pagination.skip, 10);
//!
//! let items = store.find("blogs", &plan.filter, FindOptions::from(&plan)).await?;
//! let total = store.count("blogs", &plan.filter).await?;
//! let page = translator.assemble_page(items, total, &plan.pagination)?;
//! ```

mod filter;
mod pagination;
mod projection;
mod request;
mod sort;

use quill_config::QueryConfig;

pub use filter::{
    ComparisonOperator, FieldFilter, FilterExpression, FilterValue, OperatorKey, RangeTerm,
    parse_timestamp,
};
pub use pagination::{Pagination, ResultPage, coerce_positive};
pub use projection::{FieldProjection, ProjectionField};
pub use request::{FilterRequest, ParamValue, RESERVED_KEYS};
pub use sort::{SortDirection, SortKey, SortSpec};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("This page does not exist")]
    PageOutOfRange { page: u64, skip: u64, total: u64 },

    #[error("Invalid {field}: {value:?} is not a valid date")]
    MalformedFilter { field: String, value: String },

    /// Field names starting with `$` would be read by the store as query
    /// operators.
    #[error("Invalid filter field: {field}")]
    OperatorField { field: String },
}

/// Everything needed to run a list query against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub filter: FilterExpression,
    pub sort: SortSpec,
    pub projection: FieldProjection,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default)]
pub struct QueryTranslator {
    config: QueryConfig,
}

impl QueryTranslator {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Builds the filter from every non-reserved parameter. Comparison
    /// operators in nested keys become [`OperatorKey::Comparison`]; temporal
    /// fields have their operands parsed into UTC date-times.
    pub fn build_filter(&self, request: &FilterRequest) -> Result<FilterExpression, QueryError> {
        filter::build_filter(request, &self.config)
    }

    pub fn build_sort(&self, sort: Option<&str>) -> SortSpec {
        match sort.map(SortSpec::parse) {
            Some(spec) if !spec.is_empty() => spec,
            _ => SortSpec::parse(&self.config.default_sort),
        }
    }

    pub fn build_projection(&self, fields: Option<&str>) -> FieldProjection {
        match fields.map(FieldProjection::parse) {
            Some(projection) if !projection.is_empty() => projection,
            _ => FieldProjection::excluding(&self.config.hidden_fields),
        }
    }

    pub fn build_pagination(&self, page: Option<&str>, limit: Option<&str>) -> Pagination {
        let explicit_page = page.is_some_and(|p| !p.trim().is_empty());

        Pagination::new(
            coerce_positive(page, self.config.default_page),
            coerce_positive(limit, self.config.default_limit),
            explicit_page,
        )
    }

    /// Wraps a fetched page of items. Fails when the client asked for a page
    /// that starts past the end of the result set.
    pub fn assemble_page<T>(
        &self,
        items: Vec<T>,
        total: u64,
        pagination: &Pagination,
    ) -> Result<ResultPage<T>, QueryError> {
        pagination.ensure_in_range(total)?;

        Ok(ResultPage {
            items,
            total_count: total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        })
    }

    pub fn plan(&self, request: &FilterRequest) -> Result<QueryPlan, QueryError> {
        Ok(QueryPlan {
            filter: self.build_filter(request)?,
            sort: self.build_sort(request.sort()),
            projection: self.build_projection(request.fields()),
            pagination: self.build_pagination(request.page(), request.limit()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use quill_config::OperatorScope;

    fn translator() -> QueryTranslator {
        QueryTranslator::default()
    }

    #[test]
    fn test_default_pagination() {
        let pagination = translator().build_pagination(None, None);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 100);
        assert_eq!(pagination.skip, 0);
        assert!(!pagination.explicit_page);
    }

    #[test]
    fn test_invalid_page_values_fall_back() {
        for raw in ["0", "-1", "abc"] {
            let pagination = translator().build_pagination(Some(raw), None);
            assert_eq!(pagination.page, 1, "page={raw}");
            assert!(pagination.explicit_page);
        }
    }

    #[test]
    fn test_empty_page_is_not_explicit() {
        let pagination = translator().build_pagination(Some(""), Some("5"));
        assert!(!pagination.explicit_page);
        assert_eq!(pagination.limit, 5);
    }

    #[test]
    fn test_sort_precedence() {
        let spec = translator().build_sort(Some("title,-createdAt"));
        let keys: Vec<_> = spec
            .keys()
            .iter()
            .map(|k| (k.field.as_str(), k.direction))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("title", SortDirection::Ascending),
                ("createdAt", SortDirection::Descending)
            ]
        );
    }

    #[test]
    fn test_default_sort() {
        for raw in [None, Some(""), Some(" , ")] {
            let spec = translator().build_sort(raw);
            assert_eq!(spec.keys().len(), 1);
            assert_eq!(spec.keys()[0].field, "createdAt");
            assert_eq!(spec.keys()[0].direction, SortDirection::Descending);
        }
    }

    #[test]
    fn test_projection_inclusion_and_default() {
        let projection = translator().build_projection(Some("title,status"));
        let included: Vec<_> = projection
            .fields()
            .iter()
            .filter(|f| f.included)
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(included, vec!["title", "status"]);

        let projection = translator().build_projection(None);
        assert_eq!(
            projection.fields(),
            &[ProjectionField {
                field: "__v".into(),
                included: false
            }]
        );
    }

    #[test]
    fn test_temporal_range_filter() {
        let request = FilterRequest::from_pairs([("createdAt[gte]", "2025-01-01")]);
        let filter = translator().build_filter(&request).unwrap();

        assert_eq!(
            filter.get("createdAt"),
            Some(&FieldFilter::Range(vec![RangeTerm {
                operator: OperatorKey::Comparison(ComparisonOperator::Gte),
                value: FilterValue::Timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            }]))
        );
    }

    #[test]
    fn test_malformed_temporal_value() {
        let request = FilterRequest::from_pairs([("updatedAt[lt]", "not-a-date")]);
        let err = translator().build_filter(&request).unwrap_err();

        assert_eq!(
            err,
            QueryError::MalformedFilter {
                field: "updatedAt".into(),
                value: "not-a-date".into()
            }
        );
    }

    #[test]
    fn test_operator_field_names_are_rejected() {
        for key in ["$where", "$or[0]", "$expr"] {
            let request = FilterRequest::from_pairs([(key, "sleep(5000) || true")]);
            let err = translator().build_filter(&request).unwrap_err();
            assert!(matches!(err, QueryError::OperatorField { ref field } if field.starts_with('$')));
        }

        let request = FilterRequest::from_pairs([("status", "draft"), ("$where", "true")]);
        assert!(translator().plan(&request).is_err());
    }

    #[test]
    fn test_non_temporal_values_stay_text() {
        let request = FilterRequest::from_pairs([("status", "published"), ("views[gt]", "10")]);
        let filter = translator().build_filter(&request).unwrap();

        assert_eq!(
            filter.get("status"),
            Some(&FieldFilter::Equality(FilterValue::Text("published".into())))
        );
        assert_eq!(
            filter.get("views"),
            Some(&FieldFilter::Range(vec![RangeTerm {
                operator: OperatorKey::Comparison(ComparisonOperator::Gt),
                value: FilterValue::Text("10".into()),
            }]))
        );
    }

    #[test]
    fn test_unknown_operator_is_literal() {
        let request = FilterRequest::from_pairs([("author[name]", "ada")]);
        let filter = translator().build_filter(&request).unwrap();

        assert_eq!(
            filter.get("author"),
            Some(&FieldFilter::Range(vec![RangeTerm {
                operator: OperatorKey::Literal("name".into()),
                value: FilterValue::Text("ada".into()),
            }]))
        );
    }

    #[test]
    fn test_operator_values_are_not_rewritten() {
        let request = FilterRequest::from_pairs([("title", "gte")]);
        let filter = translator().build_filter(&request).unwrap();

        assert_eq!(
            filter.get("title"),
            Some(&FieldFilter::Equality(FilterValue::Text("gte".into())))
        );
    }

    #[test]
    fn test_temporal_scope_limits_rewriting() {
        let translator = QueryTranslator::new(QueryConfig {
            operator_scope: OperatorScope::TemporalFields,
            ..QueryConfig::default()
        });
        let request = FilterRequest::from_pairs([
            ("views[gt]", "10"),
            ("createdAt[lt]", "2025-06-01"),
        ]);
        let filter = translator.build_filter(&request).unwrap();

        let Some(FieldFilter::Range(views)) = filter.get("views") else {
            panic!("expected range on views");
        };
        assert_eq!(views[0].operator, OperatorKey::Literal("gt".into()));

        let Some(FieldFilter::Range(created)) = filter.get("createdAt") else {
            panic!("expected range on createdAt");
        };
        assert_eq!(
            created[0].operator,
            OperatorKey::Comparison(ComparisonOperator::Lt)
        );
    }

    #[test]
    fn test_build_filter_is_idempotent() {
        let request = FilterRequest::from_pairs([
            ("createdAt[gte]", "2025-01-01"),
            ("tags", "rust"),
            ("tags", "web"),
            ("status", "draft"),
            ("page", "3"),
        ]);
        let translator = translator();

        let first = translator.build_filter(&request).unwrap();
        let second = translator.build_filter(&request).unwrap();
        assert_eq!(first, second);
        assert!(first.get("page").is_none());
    }

    #[test]
    fn test_assemble_second_page() {
        let pagination = translator().build_pagination(Some("2"), Some("2"));
        assert_eq!(pagination.skip, 2);

        let page = translator()
            .assemble_page(vec![3, 4], 5, &pagination)
            .unwrap();
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_assemble_page_past_end() {
        let pagination = translator().build_pagination(Some("10"), Some("2"));
        assert_eq!(pagination.skip, 18);

        let err = translator()
            .assemble_page(Vec::<i32>::new(), 5, &pagination)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::PageOutOfRange {
                page: 10,
                skip: 18,
                total: 5
            }
        );
        assert_eq!(err.to_string(), "This page does not exist");
    }

    #[test]
    fn test_explicit_first_page_of_empty_set_fails() {
        let pagination = translator().build_pagination(Some("1"), None);
        assert!(translator()
            .assemble_page(Vec::<i32>::new(), 0, &pagination)
            .is_err());

        let pagination = translator().build_pagination(None, None);
        let page = translator()
            .assemble_page(Vec::<i32>::new(), 0, &pagination)
            .unwrap();
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_plan_combines_builders() {
        let request = FilterRequest::from_pairs([
            ("status", "published"),
            ("sort", "title"),
            ("fields", "title"),
            ("page", "2"),
            ("limit", "5"),
        ]);
        let plan = translator().plan(&request).unwrap();

        assert_eq!(plan.filter.len(), 1);
        assert_eq!(plan.sort.keys()[0].field, "title");
        assert_eq!(plan.projection.fields()[0].field, "title");
        assert_eq!(plan.pagination.skip, 5);
    }
}
