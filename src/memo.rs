use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

pub const DEFAULT_MEMO_ENTRIES: usize = 256;

/// Filter results for one source list, keyed by the filter inputs.
///
/// Owned by the page that owns the source list. Replacing the source must
/// call [`FilterMemo::clear`]. Eviction is FIFO once `max_entries` is
/// reached; `None` keeps every entry until the next clear.
#[derive(Debug, Clone)]
pub struct FilterMemo<K, V> {
    max_entries: Option<usize>,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for FilterMemo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::bounded(DEFAULT_MEMO_ENTRIES)
    }
}

impl<K, V> FilterMemo<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            max_entries: None,
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute(&mut self, key: &K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.get(key) {
            self.hits += 1;
            return value.clone();
        }
        self.misses += 1;
        let value = compute();

        if let Some(max) = self.max_entries {
            while self.entries.len() >= max {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key.clone(), value.clone());
        value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
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
}
