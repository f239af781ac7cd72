use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity of a drawing backend (one per render-context type or instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ResourceKey {
    backend: BackendId,
    style_key: u64,
}

/// Lazily built backend resources (sprites, glyph bitmaps) keyed by backend
/// identity and style.
///
/// Entries are only dropped through explicit invalidation or when the cache
/// is full, in which case the oldest entry goes first.
#[derive(Debug)]
pub struct ResourceCache<V> {
    entries: IndexMap<ResourceKey, V>,
    hits: u64,
    misses: u64,
}

impl<V> Default for ResourceCache<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<V> ResourceCache<V> {
    const MAX_ENTRIES: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_with(
        &mut self,
        backend: BackendId,
        style_key: u64,
        build: impl FnOnce() -> V,
    ) -> &V {
        let key = ResourceKey { backend, style_key };
        if let Some(index) = self.entries.get_index_of(&key) {
            self.hits = self.hits.saturating_add(1);
            return &self.entries[index];
        }

        self.misses = self.misses.saturating_add(1);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.shift_remove_index(0);
        }
        let (index, _) = self.entries.insert_full(key, build());
        &self.entries[index]
    }

    #[must_use]
    pub fn contains(&self, backend: BackendId, style_key: u64) -> bool {
        self.entries.contains_key(&ResourceKey { backend, style_key })
    }

    /// Drops everything built for `backend`; returns how many entries went.
    pub fn invalidate_backend(&mut self, backend: BackendId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.backend != backend);
        let removed = before - self.entries.len();
        debug!(backend = backend.0, removed, "invalidate backend resources");
        removed
    }

    /// Drops everything; styles feed every key.
    pub fn invalidate_style(&mut self) {
        debug!(size = self.entries.len(), "invalidate styled resources");
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> ResourceCacheStats {
        ResourceCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}
