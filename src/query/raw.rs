//! URL query state as read from a query string.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

/// Value of one query key: a single string, or several when the key repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// First non-empty value, skipping blanks left by repeated keys.
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(s) => Some(s.as_str()).filter(|v| !v.is_empty()),
            QueryValue::Many(values) => values.iter().map(String::as_str).find(|v| !v.is_empty()),
        }
    }

    pub fn to_list(&self) -> Vec<String> {
        match self {
            QueryValue::Single(s) => vec![s.clone()],
            QueryValue::Many(values) => values.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(s) => s.is_empty(),
            QueryValue::Many(values) => values.is_empty(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Many(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Open mapping of query keys to values. No schema; readers pick the keys
/// they know and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuery {
    entries: BTreeMap<String, QueryValue>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=1&b=2&b=3` (a leading `?` is accepted). Repeated keys collect
    /// into [`QueryValue::Many`].
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Add one value under `key`, turning an existing single value into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::Single(value));
            }
            Entry::Occupied(slot) => {
                let slot = slot.into_mut();
                if let QueryValue::Single(prev) = slot {
                    let prev = std::mem::take(prev);
                    *slot = QueryValue::Many(vec![prev]);
                }
                if let QueryValue::Many(values) = slot {
                    values.push(value);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    /// First non-empty value stored under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)?.first()
    }

    /// All values stored under `key` as a list, if any.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).filter(|v| !v.is_empty()).map(QueryValue::to_list)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode back into `a=1&b=2&b=3` form.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            for v in value.to_list() {
                serializer.append_pair(key, &v);
            }
        }
        serializer.finish()
    }
}

impl FromIterator<(String, String)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut query = RawQuery::new();
        query.extend(iter);
        query
    }
}

impl Extend<(String, String)> for RawQuery {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_become_lists() {
        let q = RawQuery::parse("?country=BE&funding=Erasmus%2B&funding=FAME&funding=Other");
        assert_eq!(q.get("country"), Some(&QueryValue::from("BE")));
        assert_eq!(
            q.get("funding"),
            Some(&QueryValue::from(vec!["Erasmus+", "FAME", "Other"]))
        );
    }

    #[test]
    fn text_ignores_empty_values() {
        let q = RawQuery::parse("city=&country=BE");
        assert_eq!(q.text("city"), None);
        assert_eq!(q.text("country"), Some("BE"));
        assert_eq!(q.text("missing"), None);
    }

    #[test]
    fn list_wraps_single_value() {
        let q = RawQuery::parse("mobility_type=student");
        assert_eq!(q.list("mobility_type"), Some(vec!["student".to_string()]));
        assert_eq!(q.list("funding"), None);
    }

    #[test]
    fn text_skips_blank_repeats() {
        let q = RawQuery::parse("city=&city=Namur&city=Liege");
        assert_eq!(q.text("city"), Some("Namur"));
        assert_eq!(RawQuery::parse("city=&city=").text("city"), None);
    }

    #[test]
    fn encodes_back_to_query_string() {
        let mut q = RawQuery::parse("b=2&a=1");
        q.insert("funding", vec!["Erasmus+", "FAME"]);
        assert_eq!(q.to_query_string(), "a=1&b=2&funding=Erasmus%2B&funding=FAME");
    }
}
