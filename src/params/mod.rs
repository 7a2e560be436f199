//! Request parameters and their encodings.
//!
//! - `value.rs`: the closed set of parameter value kinds
//! - `query.rs`: URL query string encoding (GET requests)
//! - `json.rs`: JSON object body encoding (non-multipart requests)

pub mod json;
pub mod query;
pub mod value;

pub use json::{encode_json, to_json_object};
pub use query::to_query_string;
pub use value::{ParamValue, ToJson};

/// Ordered mapping of parameter name to optional value.
///
/// Iteration follows insertion order. Re-inserting a name replaces its value
/// in place. `None` entries are kept here but skipped by every encoder.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of an optional value.
    pub fn with_opt<V: Into<ParamValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.insert_opt(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.insert_opt(name, Some(value));
    }

    pub fn insert_opt<V: Into<ParamValue>>(&mut self, name: impl Into<String>, value: Option<V>) {
        let name = name.into();
        let value = value.map(Into::into);
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        self.entries.remove(idx).1
    }

    /// Take a value out, leaving the entry in place without a value.
    pub fn take(&mut self, name: &str) -> Option<ParamValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.take())
    }

    /// Entries with a value, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Number of entries with a value.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for Params {
    type Item = (String, Option<ParamValue>);
    type IntoIter = std::vec::IntoIter<(String, Option<ParamValue>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, Option<V>)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert_opt(k, v);
        }
        params
    }
}
