//! EntryStore: growable slot array owning the keys and values.

use std::collections::TryReserveError;

/// An owned entry. The key of a stored entry is always non-empty; slot
/// freeness is the enclosing `Option` in the store, and an absent value is
/// the `None` inside the entry.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: Option<V>,
}

/// Growable entry storage. Positions are stable for the life of an entry:
/// growth appends slots, it never moves or renumbers the existing ones, so
/// the index can reference entries by plain position.
#[derive(Debug)]
pub(crate) struct EntryStore<V> {
    slots: Vec<Option<Entry<V>>>,
}

impl<V> EntryStore<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Doubles the slot array without aborting on allocation failure. On
    /// error nothing changed; on success the new upper half is all free.
    pub(crate) fn grow_double(&mut self) -> Result<(), TryReserveError> {
        let old = self.slots.len();
        self.slots.try_reserve_exact(old)?;
        self.slots.resize_with(old * 2, || None);
        Ok(())
    }

    /// Finds a free slot scanning from `start`, wrapping at capacity. The
    /// caller keeps `start` at its live-entry count, which makes fill-only
    /// workloads hit a free slot immediately.
    pub(crate) fn find_free(&self, start: usize) -> usize {
        let cap = self.slots.len();
        debug_assert!(start < cap);
        let mut i = start;
        for _ in 0..cap {
            if self.slots[i].is_none() {
                return i;
            }
            i = if i + 1 == cap { 0 } else { i + 1 };
        }
        unreachable!("a free slot must exist while live entries < capacity");
    }

    pub(crate) fn get(&self, i: usize) -> Option<&Entry<V>> {
        self.slots[i].as_ref()
    }

    pub(crate) fn get_mut(&mut self, i: usize) -> Option<&mut Entry<V>> {
        self.slots[i].as_mut()
    }

    pub(crate) fn install(&mut self, i: usize, entry: Entry<V>) {
        debug_assert!(self.slots[i].is_none(), "slot {} must be free", i);
        self.slots[i] = Some(entry);
    }

    pub(crate) fn release(&mut self, i: usize) -> Option<Entry<V>> {
        self.slots[i].take()
    }

    /// Live entries in storage order, with their positions.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (usize, &Entry<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }
}
