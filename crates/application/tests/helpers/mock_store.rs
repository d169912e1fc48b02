#![allow(dead_code)]

use dnscache_application::ports::CacheStore;
use dnscache_domain::{CacheEntry, CacheKey};
use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// Mock CacheStore: plain map, no expiry
// ============================================================================

#[derive(Default)]
pub struct MockCacheStore {
    data: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MockCacheStore {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.data.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.data.lock().unwrap().insert(key, entry);
    }

    fn flush(&self, key: Option<&CacheKey>) {
        let mut data = self.data.lock().unwrap();
        match key {
            Some(key) => {
                data.remove(key);
            }
            None => data.clear(),
        }
    }

    fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.data.lock().unwrap().contains_key(key)
    }

    fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.data
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
