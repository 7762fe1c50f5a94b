//! An indexed binary min-heap.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

/// Errors from heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("heap is empty")]
    Empty,
    #[error("key not present in the heap")]
    KeyNotFound,
    #[error("new priority is not strictly smaller than the current one")]
    NotDecreasing,
}

/// A binary min-heap over `(key, priority)` pairs with an auxiliary
/// key-to-slot map, so that decrease-key runs in O(log n) instead of a
/// linear scan.
///
/// Duplicate discipline: [`insert`](Self::insert) on a key that is already
/// present updates its priority in place (sifting in whichever direction
/// restores heap order), so every key occupies exactly one slot and stale
/// duplicate entries can never be extracted. The slot map is updated on
/// every insert, swap and removal and is always authoritative.
///
/// Ties in priority are broken by heap structure: extraction order between
/// equal priorities is deterministic for a fixed operation sequence but
/// otherwise unspecified.
///
/// Priorities are compared with `PartialOrd`; incomparable values (such as
/// a floating-point NaN) must not be inserted.
#[derive(Debug, Clone, Default)]
pub struct IndexedHeap<K, P> {
    entries: Vec<(K, P)>,
    slots: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash, P: PartialOrd + Copy> IndexedHeap<K, P> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Number of keys currently in the heap.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the heap holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `key` with `priority`, or update its priority if present.
    ///
    /// O(log n). Updating moves the entry up or down as needed, so this is
    /// equivalent to a decrease-key (or increase-key) for existing keys.
    pub fn insert(&mut self, key: K, priority: P) {
        if let Some(&i) = self.slots.get(&key) {
            let old = self.entries[i].1;
            self.entries[i].1 = priority;
            if priority < old {
                self.sift_up(i);
            } else {
                self.sift_down(i);
            }
            return;
        }
        self.entries.push((key, priority));
        let i = self.entries.len() - 1;
        self.slots.insert(key, i);
        self.sift_up(i);
    }

    /// Lower the priority of an existing key.
    ///
    /// Fails with [`HeapError::KeyNotFound`] if the key is absent and with
    /// [`HeapError::NotDecreasing`] unless the new priority is strictly
    /// smaller than the current one.
    pub fn decrease_key(&mut self, key: K, priority: P) -> Result<(), HeapError> {
        let &i = self.slots.get(&key).ok_or(HeapError::KeyNotFound)?;
        if priority >= self.entries[i].1 {
            return Err(HeapError::NotDecreasing);
        }
        self.entries[i].1 = priority;
        self.sift_up(i);
        Ok(())
    }

    /// Remove and return the entry with the smallest priority.
    pub fn extract_min(&mut self) -> Result<(K, P), HeapError> {
        let &(key, priority) = self.entries.first().ok_or(HeapError::Empty)?;
        self.slots.remove(&key);
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        self.entries.truncate(last);
        if let Some(&(moved, _)) = self.entries.first() {
            self.slots.insert(moved, 0);
            self.sift_down(0);
        }
        Ok((key, priority))
    }

    /// The current minimum entry, without removing it.
    pub fn peek_min(&self) -> Option<(K, P)> {
        self.entries.first().copied()
    }

    /// Whether `key` is currently in the heap.
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].1 >= self.entries[parent].1 {
                break;
            }
            self.swap_slots(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < len && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < len && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap_slots(i, smallest);
            i = smallest;
        }
    }

    /// Swap two heap slots and keep the key index in sync.
    fn swap_slots(&mut self, i: usize, j: usize) {
        self.entries.swap(i, j);
        self.slots.insert(self.entries[i].0, i);
        self.slots.insert(self.entries[j].0, j);
        debug_assert_eq!(self.slots.len(), self.entries.len());
    }
}
