//! HTTP Utilities
//!
//! This module contains the transport-facing data types:
//! - request and response values
//! - the injectable transport abstraction and its reqwest implementation

pub mod request;
pub mod response;
pub mod transport;

// Re-export main types
pub use request::*;
pub use response::*;
pub use transport::*;

/// Merge extra headers into base headers.
///
/// Extra headers override base headers with the same name (case-insensitive);
/// the overriding entry keeps the position of the base entry.
pub fn merge_headers(base: &[(String, String)], extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = base.to_vec();
    for (k, v) in extra {
        set_header(&mut merged, k, v);
    }
    merged
}

/// Set `name` to `value`, replacing an existing entry (case-insensitive).
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(slot) => *slot = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Collect the values of every header named `name` (ASCII case-insensitive).
pub(crate) fn values_matching<'a>(headers: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
        .collect()
}
