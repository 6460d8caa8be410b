//! HashIndex: open-addressing probe table with lazy (tombstone) deletion.

use std::collections::TryReserveError;

/// One probe slot. `Occupied` caches the entry key's hash so probing can
/// reject mismatches without touching the entry store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Empty,
    Tombstone,
    Occupied { hash: u32, entry: usize },
}

/// A successful probe: the index slot that matched and the entry store
/// position it references.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Hit {
    pub(crate) slot: usize,
    pub(crate) entry: usize,
}

/// Flat probe table sized at 1.5x the entry capacity, so at least a third
/// of the slots stay claimable while the entry store is not full.
#[derive(Debug)]
pub(crate) struct HashIndex {
    slots: Vec<Slot>,
}

impl HashIndex {
    fn slots_for(entry_capacity: usize) -> usize {
        entry_capacity + (entry_capacity >> 1)
    }

    pub(crate) fn with_entry_capacity(entry_capacity: usize) -> Self {
        debug_assert!(entry_capacity > 0);
        Self {
            slots: vec![Slot::Empty; Self::slots_for(entry_capacity)],
        }
    }

    /// Fallible variant for the growth path: reserves the slot array without
    /// aborting on allocation failure.
    pub(crate) fn try_with_entry_capacity(entry_capacity: usize) -> Result<Self, TryReserveError> {
        debug_assert!(entry_capacity > 0);
        let len = Self::slots_for(entry_capacity);
        let mut slots = Vec::new();
        slots.try_reserve_exact(len)?;
        slots.resize(len, Slot::Empty);
        Ok(Self { slots })
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn next(&self, i: usize) -> usize {
        if i + 1 == self.slots.len() {
            0
        } else {
            i + 1
        }
    }

    /// Probes for an entry with the given hash. `eq` is consulted only for
    /// occupied slots whose cached hash matches, receiving the candidate's
    /// entry position.
    ///
    /// The probe walks through tombstones: an entry inserted past a freed
    /// slot must stay reachable. It stops at the first empty slot, or after
    /// one full cycle when churn has left the table with no empty slots.
    pub(crate) fn find(&self, hash: u32, mut eq: impl FnMut(usize) -> bool) -> Option<Hit> {
        let mut i = hash as usize % self.slots.len();
        for _ in 0..self.slots.len() {
            match self.slots[i] {
                Slot::Empty => return None,
                Slot::Occupied { hash: h, entry } if h == hash && eq(entry) => {
                    return Some(Hit { slot: i, entry });
                }
                _ => {}
            }
            i = self.next(i);
        }
        None
    }

    /// Claims a slot for a new entry at the first empty or freed slot on the
    /// probe path. Freed slots are immediately reusable for inserts even
    /// though lookups walk through them.
    ///
    /// The caller must have checked the key is absent: claiming never
    /// deduplicates.
    pub(crate) fn claim(&mut self, hash: u32, entry: usize) {
        let mut i = hash as usize % self.slots.len();
        for _ in 0..self.slots.len() {
            match self.slots[i] {
                Slot::Empty | Slot::Tombstone => {
                    self.slots[i] = Slot::Occupied { hash, entry };
                    return;
                }
                Slot::Occupied { .. } => {}
            }
            i = self.next(i);
        }
        unreachable!("a claimable slot must exist while live entries < index slots");
    }

    /// Frees one occupied slot, leaving a tombstone so probe chains passing
    /// through it stay intact. Slots never revert to empty short of a full
    /// rebuild.
    pub(crate) fn release(&mut self, slot: usize) {
        debug_assert!(matches!(self.slots[slot], Slot::Occupied { .. }));
        self.slots[slot] = Slot::Tombstone;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Capacity 2 gives a 3-slot table: small enough to script every probe
    // path by picking hashes mod 3.
    fn tiny() -> HashIndex {
        HashIndex::with_entry_capacity(2)
    }

    /// Invariant: a claimed entry is found again under the same hash, and
    /// the hit reports the entry position it was claimed with.
    #[test]
    fn claim_then_find() {
        let mut ix = tiny();
        ix.claim(0, 7);
        let hit = ix.find(0, |e| e == 7).expect("entry just claimed");
        assert_eq!(hit.entry, 7);
        assert_eq!(hit.slot, 0);
    }

    /// Invariant: lookups walk through tombstones while inserts reuse them.
    /// An entry claimed past a slot that is later freed must stay reachable,
    /// and the freed slot must be the next one claimed on that probe path.
    #[test]
    fn probe_asymmetry_across_tombstone() {
        let mut ix = tiny();
        // Hashes 0 and 3 both start probing at slot 0.
        ix.claim(0, 0); // slot 0
        ix.claim(3, 1); // collides, lands in slot 1

        let a = ix.find(0, |e| e == 0).expect("first entry present");
        assert_eq!(a.slot, 0);
        ix.release(a.slot);

        // The probe for entry 1 passes the tombstone in slot 0.
        let b = ix.find(3, |e| e == 1).expect("entry past tombstone");
        assert_eq!(b.slot, 1);

        // A fresh claim on the same path reuses the tombstone.
        ix.claim(6, 2);
        let c = ix.find(6, |e| e == 2).expect("entry in reused slot");
        assert_eq!(c.slot, 0);
    }

    /// Invariant: a probe ending at an occupied slot with a different hash
    /// wraps around the end of the table.
    #[test]
    fn probe_wraps_at_table_end() {
        let mut ix = tiny();
        ix.claim(2, 0); // slot 2, the last one
        ix.claim(5, 1); // collides at slot 2, wraps to slot 0
        let hit = ix.find(5, |e| e == 1).expect("wrapped entry present");
        assert_eq!(hit.slot, 0);
    }

    /// Invariant: a miss over a table with no empty slots terminates after
    /// one full cycle instead of probing forever. Tombstones never stop the
    /// walk, so a saturated table has no natural stopping slot.
    #[test]
    fn miss_terminates_without_empty_slots() {
        let mut ix = tiny();
        ix.claim(0, 0);
        ix.claim(1, 1);
        ix.claim(2, 2);
        assert!(ix.find(4, |_| false).is_none());

        // Same with a tombstone in the cycle.
        ix.release(1);
        assert!(ix.find(4, |_| false).is_none());
        assert!(ix.find(1, |e| e == 1).is_none(), "released entry must miss");
    }

    /// Invariant: the equality callback runs only when the cached hash
    /// matches; colliding slots with different hashes are skipped on the
    /// cheap path.
    #[test]
    fn eq_not_consulted_on_hash_mismatch() {
        let mut ix = tiny();
        ix.claim(1, 0);
        let calls = Cell::new(0);
        let miss = ix.find(4, |_| {
            calls.set(calls.get() + 1);
            true
        });
        assert!(miss.is_none());
        assert_eq!(calls.get(), 0, "eq must not run for hash 1 != 4");
    }

    /// Invariant: releasing one of two colliding entries leaves the other
    /// reachable regardless of which one went first.
    #[test]
    fn release_keeps_sibling_reachable() {
        for released_first in [0usize, 1usize] {
            let mut ix = tiny();
            ix.claim(0, 0);
            ix.claim(3, 1);
            let kept = 1 - released_first;
            let gone = ix
                .find([0, 3][released_first], |e| e == released_first)
                .expect("present before release");
            ix.release(gone.slot);
            assert!(
                ix.find([0, 3][kept], |e| e == kept).is_some(),
                "sibling of released entry must stay reachable"
            );
        }
    }
}
