//! JSON:API query string builder

use itertools::Itertools;

/// Ordered set of query parameters for a JSON:API request. Setting a key that
/// is already present replaces its value, so each key appears at most once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Get the value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set `filter[name]` if a non-blank value was given. The value is trimmed
    pub fn filter(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.set(format!("filter[{name}]"), value);
        }
    }

    /// Set `fields[type]`, the sparse fieldset for a resource type
    pub fn fields(&mut self, resource_type: &str, fields: &[&str]) {
        if !fields.is_empty() {
            self.set(format!("fields[{resource_type}]"), fields.join(","));
        }
    }

    /// Set `include`, the relationship paths to side-load
    pub fn include(&mut self, paths: &[&str]) {
        if !paths.is_empty() {
            self.set("include", paths.join(","));
        }
    }

    /// Set `sort` if given. Empty sort is omitted
    pub fn sort(&mut self, sort: Option<&str>) {
        if let Some(sort) = sort.map(str::trim).filter(|s| !s.is_empty()) {
            self.set("sort", sort);
        }
    }

    /// Set `page[limit]` and `page[offset]`. Zero values are omitted so the
    /// server applies its defaults
    pub fn page(&mut self, limit: usize, offset: usize) {
        if limit > 0 {
            self.set("page[limit]", limit.to_string());
        }
        if offset > 0 {
            self.set("page[offset]", offset.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.set(key, value);
        }
        query
    }
}

/// Human-readable form, unencoded. Used for logging only
impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|(k, v)| format!("{k}={v}")).join("&")
        )
    }
}
