//! Single-slot memoization
//!
//! Caches the last computed value together with the input and the version of
//! the data it was derived from.

/// Remembers one (input, version) -> value mapping
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, u64, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for (`key`, `version`) or compute and store it
    pub fn get_or_compute<F>(&mut self, key: K, version: u64, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        if let Some((cached_key, cached_version, value)) = &self.slot {
            if *cached_key == key && *cached_version == version {
                return value.clone();
            }
        }

        let value = compute(&key);
        self.slot = Some((key, version, value.clone()));
        value
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}
