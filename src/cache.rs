//! Similar-songs Cache Layer
//!
//! LRU cache for `/findSimilarSongs` answers so the dashboard does not hit
//! the upstream service each time the same track is opened.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::track::{Track, TrackId};

/// Default cache capacity
const CACHE_CAPACITY: usize = 256;

/// Thread-safe LRU cache of similar-track lists
pub struct SimilarCache {
    entries: Mutex<LruCache<TrackId, Vec<Track>>>,
}

impl SimilarCache {
    pub fn new() -> Self {
        Self::with_capacity(NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, id: TrackId) -> Option<Vec<Track>> {
        self.entries.lock().ok()?.get(&id).cloned()
    }

    pub fn put(&self, id: TrackId, tracks: Vec<Track>) {
        if let Ok(mut cache) = self.entries.lock() {
            cache.put(id, tracks);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.entries.lock() {
            cache.clear();
        }
    }
}

impl Default for SimilarCache {
    fn default() -> Self {
        Self::new()
    }
}
