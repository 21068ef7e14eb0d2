use crate::engines::evaluation::canonical::CanonicalKey;
use crate::types::FitnessValue;
use std::collections::HashMap;

/// Per-run memo of fitness values keyed by canonical placement.
///
/// Owned by a single objective function and cleared at the start of every
/// run. There is no eviction: the key space for a fixed precision and exit
/// count is small compared to population x generations.
#[derive(Debug, Default)]
pub struct FitnessCache {
    data: HashMap<CanonicalKey, FitnessValue>,
    hits: usize,
    misses: usize,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&mut self, key: &CanonicalKey) -> Option<FitnessValue> {
        match self.data.get(key) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, key: CanonicalKey, value: FitnessValue) {
        self.data.insert(key, value);
    }

    /// Drop every entry and zero the counters.
    pub fn reset(&mut self) {
        self.data.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::evaluation::canonical::canonicalize;

    #[test]
    fn test_store_then_lookup() {
        let mut cache = FitnessCache::new();
        let key = canonicalize(&[0.1, 0.2], 10.0, 0.1).unwrap();

        assert_eq!(cache.lookup(&key), None);
        cache.store(key.clone(), 12.5);
        assert_eq!(cache.lookup(&key), Some(12.5));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_reset_clears_entries_and_counters() {
        let mut cache = FitnessCache::new();
        let key = canonicalize(&[0.5], 10.0, 0.1).unwrap();
        cache.store(key.clone(), 1.0);
        cache.lookup(&key);

        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.lookup(&key), None);
    }
}
