//! Decoded query parameters, the read-only input of a bind pass.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use url::Url;

/// Query keys mapped to their values in first-seen order.
///
/// A key may repeat; lookups through [`QuerySource::get`] return its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySource {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl QuerySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `application/x-www-form-urlencoded` text. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Decode the query component of `url`. A URL without one yields an empty source.
    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::parse).unwrap_or_default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::new();
        for (key, value) in pairs {
            source.append(key, value);
        }
        source
    }

    /// Add a value under `key`, after any values already present.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1.push(value),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
            .unwrap_or_default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for QuerySource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl Serialize for QuerySource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}
