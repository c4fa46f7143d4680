//! Field projections.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionField {
    pub field: String,
    pub included: bool,
}

/// Which fields to return. The store always returns the identifier unless it
/// is excluded explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection {
    fields: Vec<ProjectionField>,
}

impl FieldProjection {
    pub fn excluding<S: AsRef<str>>(fields: &[S]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|field| ProjectionField {
                    field: field.as_ref().to_string(),
                    included: false,
                })
                .collect(),
        }
    }

    /// Parses `title,status` (inclusion) or `-content` (exclusion) lists.
    pub fn parse(raw: &str) -> Self {
        let mut fields: Vec<ProjectionField> = Vec::new();

        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (field, included) = match token.strip_prefix('-') {
                Some(field) => (field.trim(), false),
                None => (token, true),
            };
            if field.is_empty() || fields.iter().any(|f| f.field == field) {
                continue;
            }
            fields.push(ProjectionField {
                field: field.to_string(),
                included,
            });
        }

        Self { fields }
    }

    pub fn fields(&self) -> &[ProjectionField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inclusion() {
        let projection = FieldProjection::parse("title, status");
        let names: Vec<_> = projection
            .fields()
            .iter()
            .map(|f| (f.field.as_str(), f.included))
            .collect();
        assert_eq!(names, vec![("title", true), ("status", true)]);
    }

    #[test]
    fn test_parse_exclusion_and_duplicates() {
        let projection = FieldProjection::parse("-content,-content,,");
        assert_eq!(
            projection.fields(),
            &[ProjectionField {
                field: "content".into(),
                included: false
            }]
        );
    }

    #[test]
    fn test_excluding() {
        let projection = FieldProjection::excluding(&["__v"]);
        assert_eq!(projection.fields().len(), 1);
        assert!(!projection.fields()[0].included);
    }
}
