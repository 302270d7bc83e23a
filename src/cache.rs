//! Session-scoped response body cache.
//!
//! Maps `(endpoint, url)` to the raw response bytes last seen for that URL.
//! One partition per endpoint, keyed by the exact URL string — no
//! normalization, no eviction, no TTL. This is best-effort memoization, not a
//! correctness-critical store: callers must tolerate a miss at any time, and
//! the cache is always empty at process start.
//!
//! `RwLock` per partition gives the layer's concurrency contract: concurrent
//! readers and writers on the same partition never observe torn bytes; a read
//! racing a write for the same key returns old or new data
//! nondeterministically.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::endpoint::Endpoint;

/// In-memory cache of raw response bodies, partitioned by endpoint.
pub struct ResponseCache {
    partitions: HashMap<Endpoint, RwLock<HashMap<String, Vec<u8>>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        let partitions = Endpoint::ALL
            .into_iter()
            .map(|ep| (ep, RwLock::new(HashMap::new())))
            .collect();
        Self { partitions }
    }

    /// Look up the cached body for a URL. `None` on a miss.
    pub fn get(&self, endpoint: Endpoint, url: &str) -> Option<Vec<u8>> {
        let partition = self.partitions.get(&endpoint)?.read().ok()?;
        partition.get(url).cloned()
    }

    /// Store a response body. Overwrites any previous entry for the URL.
    /// A poisoned lock makes this a silent no-op — the cache is advisory.
    pub fn set(&self, endpoint: Endpoint, url: &str, body: Vec<u8>) {
        if let Some(partition) = self.partitions.get(&endpoint) {
            if let Ok(mut partition) = partition.write() {
                partition.insert(url.to_string(), body);
            }
        }
    }

    /// Number of cached bodies across all partitions.
    pub fn len(&self) -> usize {
        self.partitions
            .values()
            .map(|p| p.read().map(|m| m.len()).unwrap_or(0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_then_get() {
        let cache = ResponseCache::new();
        let url = "https://rickandmortyapi.com/api/character?page=2";
        cache.set(Endpoint::Character, url, b"{\"ok\":true}".to_vec());
        assert_eq!(
            cache.get(Endpoint::Character, url),
            Some(b"{\"ok\":true}".to_vec())
        );
    }

    #[test]
    fn test_never_set_is_miss() {
        let cache = ResponseCache::new();
        assert_eq!(
            cache.get(Endpoint::Episode, "https://rickandmortyapi.com/api/episode"),
            None
        );
    }

    #[test]
    fn test_partitions_are_independent() {
        let cache = ResponseCache::new();
        let url = "https://rickandmortyapi.com/api/character/1";
        cache.set(Endpoint::Character, url, b"a".to_vec());
        assert_eq!(cache.get(Endpoint::Location, url), None);
        assert_eq!(cache.get(Endpoint::Character, url), Some(b"a".to_vec()));
    }

    #[test]
    fn test_overwrite_replaces_body() {
        let cache = ResponseCache::new();
        let url = "https://rickandmortyapi.com/api/location";
        cache.set(Endpoint::Location, url, b"old".to_vec());
        cache.set(Endpoint::Location, url, b"new".to_vec());
        assert_eq!(cache.get(Endpoint::Location, url), Some(b"new".to_vec()));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = Arc::new(ResponseCache::new());
        let url = "https://rickandmortyapi.com/api/character";
        let mut handles = Vec::new();
        for i in 0..8u8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    cache.set(Endpoint::Character, url, vec![i; 64]);
                    if let Some(body) = cache.get(Endpoint::Character, url) {
                        // Whole-body atomicity: never a mix of two writes.
                        assert_eq!(body.len(), 64);
                        assert!(body.iter().all(|b| *b == body[0]));
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
