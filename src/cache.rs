//! Content-addressed result cache
//!
//! The pipelines are deterministic functions of their inputs, so repeated
//! calls with identical inputs can reuse the previous result. Keys are the
//! hex SHA-256 of the input byte chunks; each chunk is length-prefixed
//! before hashing so adjacent chunks cannot alias ("ab","c" vs "a","bc").
//!
//! Values are handed out as `Arc` clones and must be treated as immutable.
//! There is no eviction; the cache lives for the process.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Hex SHA-256 key over length-prefixed input chunks
pub fn content_key(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// In-memory cache of pipeline results
#[derive(Debug, Default)]
pub struct ResultCache<T> {
    entries: HashMap<String, Arc<T>>,
}

impl<T> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entries.insert(key, Arc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
