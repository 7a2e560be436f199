//! Cookie persistence keyed by request host.
//!
//! The client reads stored cookies before each request and replaces them
//! with the `Set-Cookie` values of successful responses. Persistence is
//! injected through [`CookieStore`]; [`MemoryCookieStore`] keeps everything
//! in process memory.

use std::collections::HashMap;
use std::sync::RwLock;

/// Host-keyed cookie storage.
///
/// Concurrent writes for the same host are last-write-wins.
pub trait CookieStore: Send + Sync {
    /// Cookie strings previously stored for `host`.
    fn get(&self, host: &str) -> Vec<String>;

    /// Replace the cookies stored for `host`.
    fn set(&self, host: &str, cookies: Vec<String>);
}

/// In-memory [`CookieStore`].
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    inner: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, host: &str) -> Vec<String> {
        match self.inner.read() {
            Ok(map) => map.get(host).cloned().unwrap_or_default(),
            Err(poisoned) => poisoned.into_inner().get(host).cloned().unwrap_or_default(),
        }
    }

    fn set(&self, host: &str, cookies: Vec<String>) {
        let mut map = match self.inner.write() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(host.to_string(), cookies);
    }
}
