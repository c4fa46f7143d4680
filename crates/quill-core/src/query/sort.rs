//! Sort specifications.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort keys; earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Parses `title,-createdAt` style input. Blank tokens are skipped and a
    /// repeated field keeps its first position with the last direction given.
    pub fn parse(raw: &str) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();

        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let (field, direction) = match token.strip_prefix('-') {
                Some(field) => (field.trim(), SortDirection::Descending),
                None => (token, SortDirection::Ascending),
            };
            if field.is_empty() {
                continue;
            }

            match keys.iter_mut().find(|key| key.field == field) {
                Some(existing) => existing.direction = direction,
                None => keys.push(SortKey {
                    field: field.to_string(),
                    direction,
                }),
            }
        }

        Self { keys }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
