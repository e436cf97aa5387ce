//! Argument-keyed memoization for frozen collections.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A compute-once cache shared between readers.
///
/// Misses are computed outside the lock, so two threads missing on the same
/// key may both compute; the first value published wins and both callers get
/// it back. Only use this for pure functions of immutable state.
#[derive(Debug)]
pub(crate) struct Memo<K, V> {
    entries: RwLock<HashMap<K, V>>,
}
impl<K: Debug + Eq + Hash, V: Clone> Memo<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, computing and caching it on a miss.
    pub(crate) fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.read().get(&key) {
            return value.clone();
        }
        tracing::debug!(?key, "memo miss");
        let value = compute();
        self.entries.write().entry(key).or_insert(value).clone()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once_per_key() {
        let memo = Memo::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            calls.get()
        };
        assert_eq!(memo.get_or_insert_with("a", compute), 1);
        assert_eq!(memo.get_or_insert_with("a", compute), 1);
        assert_eq!(memo.get_or_insert_with("b", compute), 2);
        assert_eq!(calls.get(), 2);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_concurrent_misses_agree() {
        let memo: Memo<u8, usize> = Memo::new();
        let results: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let memo = &memo;
                    s.spawn(move || memo.get_or_insert_with(0, || i))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        // Whichever thread published first, everyone saw the same value.
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
