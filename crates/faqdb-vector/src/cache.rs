//! In-memory embedding cache keyed by normalized query text.
//!
//! Owned by a session and shared across concurrent queries. Writers take a
//! short write lock; a racing insert for the same key simply wins last,
//! which is fine because embedding the same text twice gives the same vector.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, Arc<[f32]>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<[f32]>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Store a vector. Empty vectors are never cached so a later call can retry.
    pub fn insert(&self, key: impl Into<String>, vector: Vec<f32>) -> bool {
        if vector.is_empty() {
            return false;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.into(), Arc::from(vector));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn empty_vectors_are_not_cached() {
        let cache = EmbeddingCache::new();
        assert!(!cache.insert("fees", vec![]));
        assert!(cache.get("fees").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let cache = EmbeddingCache::new();
        cache.insert("fees", vec![1.0]);
        cache.insert("fees", vec![2.0]);
        assert_eq!(cache.get("fees").as_deref(), Some(&[2.0f32][..]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_writers_keep_every_key() {
        let cache = Arc::new(EmbeddingCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..50 {
                        cache.insert(format!("q{}", i % 25), vec![t as f32, i as f32]);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("writer thread");
        }
        assert_eq!(cache.len(), 25);
        assert!(cache.get("q7").is_some_and(|v| v.len() == 2));
    }
}
