use crate::algorithm::bitset::TileBitset;
use crate::io::configuration::SUPPORT_CACHE_CAPACITY;
use crate::spatial::registry::TileRegistry;
use std::collections::HashMap;

/// Key for caching neighbour support unions
///
/// Identifies a possibility set and the direction in which its neighbour
/// lies, so that cells sharing the same set reuse one computation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SupportKey {
    direction: usize,
    source: TileBitset,
}

impl SupportKey {
    /// Create a key for the neighbour of `source` in a direction
    pub fn new(source: &TileBitset, direction: usize) -> Self {
        Self {
            direction,
            source: source.clone(),
        }
    }
}

/// Memoization cache for neighbour support calculations
///
/// Stores the set of tiles a neighbour may take given a cell's possibility
/// set. Cleared wholesale once it reaches `SUPPORT_CACHE_CAPACITY` entries.
#[derive(Default)]
pub struct SupportCache {
    /// Source set to supported neighbour set mapping
    support_cache: HashMap<SupportKey, TileBitset>,

    /// Cache performance statistics
    pub stats: CacheStats,
}

/// Performance metrics for cache effectiveness
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
}

impl SupportCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.support_cache.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.support_cache.is_empty()
    }

    /// Retrieve cached result or compute and store new one
    ///
    /// Uses the provided closure to compute the support set only when
    /// the key is not already cached.
    pub fn get_or_compute<F>(&mut self, key: SupportKey, compute_fn: F) -> &TileBitset
    where
        F: FnOnce() -> TileBitset,
    {
        use std::collections::hash_map::Entry;

        if self.support_cache.len() >= SUPPORT_CACHE_CAPACITY
            && !self.support_cache.contains_key(&key)
        {
            self.support_cache.clear();
        }

        match self.support_cache.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                entry.insert(compute_fn())
            }
        }
    }

    /// Tiles a neighbour in `direction` may take, given the source set
    ///
    /// The union over every source tile of the tiles whose facing side
    /// carries the same label.
    pub fn support(
        &mut self,
        registry: &TileRegistry,
        source: &TileBitset,
        direction: usize,
    ) -> TileBitset {
        let key = SupportKey::new(source, direction);
        self.get_or_compute(key, || {
            let mut union = TileBitset::new(registry.len());
            for tile in source.iter() {
                if let Some(allowed) = registry.supports(tile, direction) {
                    union.union_with(allowed);
                }
            }
            union
        })
        .clone()
    }
}
