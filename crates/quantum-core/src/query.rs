//! Convenience builder for HTTP query parameters.
//!
//! Quantum list calls take repeated keys (`fields=id&fields=cidr`) and
//! filter keys chosen at run time, so pairs own their keys.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Display,
    {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<V>(&mut self, key: &str, value: Option<V>)
    where
        V: Display,
    {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Append one pair per value, repeating the key.
    pub fn push_all<I, V>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for value in values {
            self.push(key, value);
        }
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Display,
    {
        self.push(key, value);
        self
    }

    /// Returns true if any pair uses `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Borrow the collected key/value pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Extend<(String, String)> for QueryParams {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.pairs.extend(iter);
    }
}
