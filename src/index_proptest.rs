#![cfg(test)]

// Property tests for the index/store pair kept inside the crate so they can
// drive the layers below the public surface directly.

use crate::hash::hash_key;
use crate::index::{HashIndex, Slot};
use crate::store::{Entry, EntryStore};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

// A miniature container over the structural layers with a pluggable hash
// function, so collision pressure can be dialed up to worst case. Fixed
// capacity: when full, inserts are refused instead of growing, which keeps
// the index churning tombstones in place.
struct Harness {
    index: HashIndex,
    store: EntryStore<i32>,
    live: usize,
    hash: fn(&str) -> u32,
}

impl Harness {
    fn new(capacity: usize, hash: fn(&str) -> u32) -> Self {
        Self {
            index: HashIndex::with_entry_capacity(capacity),
            store: EntryStore::with_capacity(capacity),
            live: 0,
            hash,
        }
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.index
            .find((self.hash)(key), |entry| {
                self.store
                    .get(entry)
                    .map(|e| e.key == key)
                    .unwrap_or(false)
            })
            .map(|hit| hit.entry)
    }

    fn insert(&mut self, key: &str, value: i32) -> bool {
        if self.find(key).is_some() || self.live == self.store.capacity() {
            return false;
        }
        let slot = self.store.find_free(self.live);
        self.store.install(
            slot,
            Entry {
                key: key.to_string(),
                value: Some(value),
            },
        );
        self.index.claim((self.hash)(key), slot);
        self.live += 1;
        true
    }

    fn remove(&mut self, key: &str) -> Option<i32> {
        let hit = self.index.find((self.hash)(key), |entry| {
            self.store
                .get(entry)
                .map(|e| e.key == key)
                .unwrap_or(false)
        })?;
        self.index.release(hit.slot);
        let entry = self
            .store
            .release(hit.entry)
            .expect("hit must reference a live entry");
        self.live -= 1;
        entry.value
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{1,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Find),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario(
    pool: Vec<String>,
    ops: Vec<OpI>,
    hash: fn(&str) -> u32,
) -> Result<(), TestCaseError> {
    // Capacity below the pool size forces the refused-insert path as well.
    let mut sut = Harness::new(4, hash);
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let inserted = sut.insert(k, v);
                let expect = !model.contains_key(k) && model.len() < 4;
                prop_assert_eq!(inserted, expect, "insert admission for {:?}", k);
                if inserted {
                    model.insert(k.clone(), v);
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                let expected = model.remove(k);
                prop_assert_eq!(removed, expected, "removed value for {:?}", k);
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let found = sut.find(k);
                prop_assert_eq!(found.is_some(), model.contains_key(k));
            }
        }

        // Post-conditions after each op
        // 1) Find/value parity for every pool key, not just the touched one.
        for k in &pool {
            match (sut.find(k), model.get(k)) {
                (Some(entry), Some(&mv)) => {
                    let stored = sut.store.get(entry).and_then(|e| e.value);
                    prop_assert_eq!(stored, Some(mv), "value parity for {:?}", k);
                }
                (None, None) => {}
                (got, want) => {
                    return Err(TestCaseError::fail(format!(
                        "presence mismatch for {:?}: sut {:?}, model {:?}",
                        k, got, want
                    )));
                }
            }
        }
        // 2) Occupancy parity: occupied index slots equal live entries, and
        //    each entry is referenced exactly once.
        prop_assert_eq!(sut.live, model.len());
        let mut seen = vec![false; sut.store.capacity()];
        let mut occupied = 0;
        for slot in sut.index.slots() {
            if let Slot::Occupied { entry, .. } = *slot {
                occupied += 1;
                prop_assert!(!seen[entry], "entry {} referenced twice", entry);
                seen[entry] = true;
                prop_assert!(sut.store.get(entry).is_some());
            }
        }
        prop_assert_eq!(occupied, sut.live);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random insert/remove/find sequences:
// - Admission: inserts succeed exactly for new keys while capacity remains.
// - `find` presence and value parity with the model after every op.
// - `remove` hands back the owned value matching the model.
// - Occupied index slots always pair 1:1 with live store entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(pool, ops, hash_key)?;
    }
}

fn const_hash(_key: &str) -> u32 {
    0 // force every key onto the same probe chain
}

// Property: Same state-machine invariants under worst-case collision
// behavior (constant hash). Every probe walks the same chain, so this
// stresses tombstone skipping, reuse, and the full-cycle stop.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(pool, ops, const_hash)?;
    }
}
