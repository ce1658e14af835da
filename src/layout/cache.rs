use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use blake3::{Hash, Hasher};

use super::grid::compile_grid_with_prefix;
use super::map::NavigationMap;
use super::overrides::{EdgeOverride, apply_overrides};

/// Content hash of a compile request (rows, prefix, overrides).
pub type MapFingerprint = Hash;

/// Entries kept by [`MapCache::new`].
pub const DEFAULT_MAP_CACHE_CAPACITY: usize = 64;

/// Memoizes compiled maps per distinct layout.
///
/// Screens whose layout is rebuilt on every render (dynamic profile rows,
/// for instance) can ask the cache instead of recompiling; identical inputs
/// return the same `Arc`. Holds at most `capacity` layouts and evicts the
/// oldest one first.
#[derive(Debug)]
pub struct MapCache {
    entries: HashMap<MapFingerprint, Arc<NavigationMap>>,
    order: VecDeque<MapFingerprint>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for MapCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAP_CACHE_CAPACITY)
    }
}

impl MapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn fingerprint<R, S>(rows: &[R], prefix: &str, overrides: &[EdgeOverride]) -> MapFingerprint
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut hasher = Hasher::new();
        write_str(&mut hasher, prefix);
        hasher.update(&(rows.len() as u64).to_le_bytes());
        for row in rows {
            let row = row.as_ref();
            hasher.update(&(row.len() as u64).to_le_bytes());
            for cell in row {
                write_str(&mut hasher, cell.as_ref());
            }
        }
        hasher.update(&(overrides.len() as u64).to_le_bytes());
        for patch in overrides {
            write_str(&mut hasher, &patch.from);
            write_str(&mut hasher, patch.direction.as_str());
            write_str(&mut hasher, &patch.to);
        }
        hasher.finalize()
    }

    pub fn get_or_compile<R, S>(
        &mut self,
        rows: &[R],
        prefix: &str,
        overrides: &[EdgeOverride],
    ) -> Arc<NavigationMap>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let key = Self::fingerprint(rows, prefix, overrides);
        if let Some(map) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return Arc::clone(map);
        }

        self.misses = self.misses.saturating_add(1);
        let map = Arc::new(apply_overrides(
            compile_grid_with_prefix(rows, prefix),
            overrides,
        ));
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.entries.insert(key, Arc::clone(&map));
        self.order.push_back(key);
        map
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

// Length-prefixed so ["ab","c"] and ["a","bc"] hash differently.
fn write_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn identical_inputs_share_one_map() {
        let mut cache = MapCache::new();
        let rows = [vec!["a", "b"], vec!["c"]];
        let first = cache.get_or_compile(&rows, "", &[]);
        let second = cache.get_or_compile(&rows, "", &[]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(first.target("b", Direction::Down), Some("c"));
    }

    #[test]
    fn fingerprint_separates_cell_boundaries() {
        let split_a = MapCache::fingerprint(&[["ab", "c"]], "", &[]);
        let split_b = MapCache::fingerprint(&[["a", "bc"]], "", &[]);
        assert_ne!(split_a, split_b);
    }

    #[test]
    fn overrides_and_prefix_change_the_key() {
        let mut cache = MapCache::new();
        let rows = [["x", "y"]];
        let plain = cache.get_or_compile(&rows, "", &[]);
        let prefixed = cache.get_or_compile(&rows, "p_", &[]);
        let patched = cache.get_or_compile(
            &rows,
            "",
            &[EdgeOverride::new("x", Direction::Up, "y")],
        );
        assert_eq!(cache.len(), 3);
        assert_eq!(plain.target("x", Direction::Up), None);
        assert_eq!(prefixed.target("p_x", Direction::Right), Some("p_y"));
        assert_eq!(patched.target("x", Direction::Up), Some("y"));
    }

    #[test]
    fn full_cache_evicts_the_oldest_layout() {
        let mut cache = MapCache::with_capacity(2);
        let first = cache.get_or_compile(&[["a"]], "", &[]);
        cache.get_or_compile(&[["b"]], "", &[]);
        cache.get_or_compile(&[["c"]], "", &[]);
        assert_eq!(cache.len(), 2);

        let again = cache.get_or_compile(&[["a"]], "", &[]);
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(cache.misses(), 4);
        assert_eq!(cache.len(), 2);

        cache.get_or_compile(&[["c"]], "", &[]);
        assert_eq!(cache.hits(), 1);
        assert_eq!(MapCache::new().capacity(), DEFAULT_MAP_CACHE_CAPACITY);
    }
}
