//! Raw list query parameters.
//!
//! Query strings arrive as flat `key=value` pairs. Bracketed keys build
//! richer shapes: `createdAt[gte]=2025-01-01` becomes a nested mapping,
//! `tags[]=rust` appends to a list, and repeating a plain key turns its value
//! into a list.

use std::collections::BTreeMap;

/// Keys that control paging and shaping rather than filtering.
pub const RESERVED_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
    Nested(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    params: BTreeMap<String, ParamValue>,
}

enum KeyShape<'a> {
    Plain(&'a str),
    Append(&'a str),
    Nested(&'a str, &'a str),
}

fn key_shape(key: &str) -> KeyShape<'_> {
    if let Some(open) = key.find('[')
        && open > 0
        && key.ends_with(']')
    {
        let name = &key[..open];
        let inner = &key[open + 1..key.len() - 1];
        if !inner.contains(['[', ']']) {
            return if inner.is_empty() {
                KeyShape::Append(name)
            } else {
                KeyShape::Nested(name, inner)
            };
        }
    }
    KeyShape::Plain(key)
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a request from decoded query string pairs, in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            request.push(&key.into(), value.into());
        }
        request
    }

    pub fn push(&mut self, key: &str, value: String) {
        match key_shape(key) {
            KeyShape::Plain(name) => self.push_scalar(name, value),
            KeyShape::Append(name) => self.push_list(name, value),
            KeyShape::Nested(name, op) => self.push_nested(name, op, value),
        }
    }

    /// Replaces whatever is stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.params.insert(key.into(), value);
    }

    fn push_scalar(&mut self, name: &str, value: String) {
        let next = match self.params.remove(name) {
            None | Some(ParamValue::Nested(_)) => ParamValue::Scalar(value),
            Some(ParamValue::Scalar(previous)) => ParamValue::List(vec![previous, value]),
            Some(ParamValue::List(mut values)) => {
                values.push(value);
                ParamValue::List(values)
            }
        };
        self.params.insert(name.to_string(), next);
    }

    fn push_list(&mut self, name: &str, value: String) {
        let next = match self.params.remove(name) {
            None | Some(ParamValue::Nested(_)) => ParamValue::List(vec![value]),
            Some(ParamValue::Scalar(previous)) => ParamValue::List(vec![previous, value]),
            Some(ParamValue::List(mut values)) => {
                values.push(value);
                ParamValue::List(values)
            }
        };
        self.params.insert(name.to_string(), next);
    }

    fn push_nested(&mut self, name: &str, op: &str, value: String) {
        match self.params.get_mut(name) {
            Some(ParamValue::Nested(ops)) => {
                ops.insert(op.to_string(), value);
            }
            _ => {
                let ops = BTreeMap::from([(op.to_string(), value)]);
                self.params.insert(name.to_string(), ParamValue::Nested(ops));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Value of a reserved control key. Repeated keys resolve to the last
    /// value; nested shapes are ignored.
    pub fn control(&self, key: &str) -> Option<&str> {
        match self.params.get(key)? {
            ParamValue::Scalar(value) => Some(value),
            ParamValue::List(values) => values.last().map(String::as_str),
            ParamValue::Nested(_) => None,
        }
    }

    pub fn page(&self) -> Option<&str> {
        self.control("page")
    }

    pub fn limit(&self) -> Option<&str> {
        self.control("limit")
    }

    pub fn sort(&self) -> Option<&str> {
        self.control("sort")
    }

    pub fn fields(&self) -> Option<&str> {
        self.control("fields")
    }

    /// Parameters left after removing the reserved keys.
    pub fn filter_params(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.params
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_pairs_are_scalars() {
        let request = FilterRequest::from_pairs([("status", "published"), ("author", "ada")]);

        assert_eq!(
            request.get("status"),
            Some(&ParamValue::Scalar("published".into()))
        );
        assert_eq!(request.get("author"), Some(&ParamValue::Scalar("ada".into())));
    }

    #[test]
    fn test_bracketed_operators_nest() {
        let request = FilterRequest::from_pairs([
            ("createdAt[gte]", "2025-01-01"),
            ("createdAt[lt]", "2025-02-01"),
        ]);

        let expected = BTreeMap::from([
            ("gte".to_string(), "2025-01-01".to_string()),
            ("lt".to_string(), "2025-02-01".to_string()),
        ]);
        assert_eq!(request.get("createdAt"), Some(&ParamValue::Nested(expected)));
    }

    #[test]
    fn test_repeated_keys_become_lists() {
        let request = FilterRequest::from_pairs([("tags", "rust"), ("tags", "web"), ("tags[]", "api")]);

        assert_eq!(
            request.get("tags"),
            Some(&ParamValue::List(vec![
                "rust".into(),
                "web".into(),
                "api".into()
            ]))
        );
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let request = FilterRequest::from_pairs([
            ("page", "2"),
            ("limit", "10"),
            ("sort", "title"),
            ("fields", "title"),
            ("status", "draft"),
        ]);

        let keys: Vec<_> = request.filter_params().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["status"]);
        assert_eq!(request.page(), Some("2"));
        assert_eq!(request.limit(), Some("10"));
        assert_eq!(request.sort(), Some("title"));
        assert_eq!(request.fields(), Some("title"));
    }

    #[test]
    fn test_repeated_control_key_takes_last() {
        let request = FilterRequest::from_pairs([("page", "2"), ("page", "3")]);
        assert_eq!(request.page(), Some("3"));
    }

    #[test]
    fn test_malformed_brackets_stay_plain() {
        let request = FilterRequest::from_pairs([("[gte]", "1"), ("a[b][c]", "2")]);

        assert_eq!(request.get("[gte]"), Some(&ParamValue::Scalar("1".into())));
        assert_eq!(request.get("a[b][c]"), Some(&ParamValue::Scalar("2".into())));
    }
}
