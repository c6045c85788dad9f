//! URL-style query parameters.
//!
//! Every parameter is either a single string or a list of strings, mirroring
//! how repeated keys (`field=a&field=b`) arrive from a browser URL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameters keyed by name.
pub type Query = BTreeMap<String, QueryValue>;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl QueryValue {
    /// First value, for parameters expected to be scalar.
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Scalar(s) => Some(s),
            QueryValue::List(values) => values.first().map(String::as_str),
        }
    }

    /// All values, wrapping a scalar into a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            QueryValue::Scalar(s) => vec![s.clone()],
            QueryValue::List(values) => values.clone(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Scalar(s) => {
                let first = std::mem::take(s);
                *self = QueryValue::List(vec![first, value]);
            }
            QueryValue::List(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::List(values)
    }
}

/// First non-empty value of a parameter.
pub fn decode_scalar(value: Option<&QueryValue>) -> Option<String> {
    value
        .and_then(QueryValue::first)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Every value of a parameter; missing parameters decode to an empty list.
pub fn decode_list(value: Option<&QueryValue>) -> Vec<String> {
    value.map(QueryValue::to_list).unwrap_or_default()
}

/// The query parameters of the current URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub query: Query,
}

impl Location {
    pub fn new(query: Query) -> Self {
        Self { query }
    }

    /// Build from `(key, value)` pairs; repeated keys collect into a list.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Query::new();
        for (key, value) in pairs {
            let key: String = key.into();
            let value: String = value.into();
            match query.get_mut(&key) {
                Some(existing) => existing.push(value),
                None => {
                    query.insert(key, QueryValue::Scalar(value));
                }
            }
        }
        Self::new(query)
    }

    /// Parse a percent-encoded query string such as `field=a&field=b&sort=-a`.
    /// A leading `?` is ignored.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }

    /// Serialize back to a percent-encoded query string, keys in order.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            for v in value.to_list() {
                serializer.append_pair(key, &v);
            }
        }
        serializer.finish()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.query.get(key)
    }

    pub fn decode_scalar(&self, key: &str) -> Option<String> {
        decode_scalar(self.get(key))
    }

    pub fn decode_list(&self, key: &str) -> Vec<String> {
        decode_list(self.get(key))
    }

    /// Apply an update: `Some` values replace, `None` values remove the key.
    pub fn apply(&mut self, update: BTreeMap<String, Option<QueryValue>>) {
        for (key, value) in update {
            match value {
                Some(v) => {
                    self.query.insert(key, v);
                }
                None => {
                    self.query.remove(&key);
                }
            }
        }
    }
}
