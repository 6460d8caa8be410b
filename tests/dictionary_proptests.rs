// Dictionary property tests (consolidated).
//
// Property 1: model equivalence on a small key pool.
//  - Model: HashMap<String, Option<String>>; None mirrors a live key with
//    an absent value.
//  - Invariant: get_str(key) == model value (absent values read as None);
//               len() == model.len() after every op.
//  - Operations: set text, set absent, unset, read.
//
// Property 2: growth and tombstone churn keep parity.
//  - Model: HashMap<String, String>.
//  - Setup: 140 sequential inserts force a rehash past the capacity floor.
//  - Operations: set (insert or overwrite) and unset on a shared keyspace,
//    so tombstones accumulate and get reused.
//  - At each step: read parity for the touched key; at the end: parity and
//    the ledger for the whole keyspace.
use proptest::prelude::*;
use std::collections::HashMap;
use strdict::Dictionary;

// Property 1: reads and the ledger match the model under mixed mutation.
proptest! {
    #[test]
    fn prop_model_equivalence(keys in 1usize..=5, ops in proptest::collection::vec((0u8..=3u8, 0usize..100usize), 1..100)) {
        let mut d = Dictionary::new();
        let mut model: HashMap<String, Option<String>> = HashMap::new();

        for (op, raw_k) in ops {
            let k = raw_k % keys;
            let key = format!("k{}", k);
            match op {
                // Set a text value derived from the raw index.
                0 => {
                    let val = format!("v{}", raw_k);
                    d.set_str(&key, &val).unwrap();
                    model.insert(key.clone(), Some(val));
                }
                // Set an absent value: the key stays live, reads miss.
                1 => {
                    d.set(&key, None).unwrap();
                    model.insert(key.clone(), None);
                }
                // Unset drops the entry if present.
                2 => {
                    d.unset(&key);
                    model.remove(&key);
                }
                // Read-only step; the parity check below is the probe.
                3 => {}
                _ => unreachable!(),
            }

            // Invariant after each step: read parity for the touched key
            // and ledger parity overall.
            prop_assert_eq!(d.get_str(&key), model.get(&key).and_then(|v| v.as_deref()));
            prop_assert_eq!(d.len(), model.len());
        }

        // Final invariant: full read parity across the pool.
        for k in 0..keys {
            let key = format!("k{}", k);
            prop_assert_eq!(d.get_str(&key), model.get(&key).and_then(|v| v.as_deref()));
        }
    }
}

// Property 2: a grown, churned dictionary stays in lockstep with the model.
proptest! {
    #[test]
    fn prop_growth_and_churn_keep_parity(ops in proptest::collection::vec((0u8..=1u8, 0usize..140usize, 0u16..1000u16), 50..250)) {
        let mut d = Dictionary::with_capacity(0);
        let mut model: HashMap<String, String> = HashMap::new();

        for i in 0..140usize {
            let key = format!("k{}", i);
            let val = format!("v{}", i);
            d.set_str(&key, &val).unwrap();
            model.insert(key, val);
        }
        prop_assert!(d.capacity() > 128, "setup must cross the growth boundary");

        for (op, raw_k, salt) in ops {
            let key = format!("k{}", raw_k);
            match op {
                // Insert or overwrite.
                0 => {
                    let val = format!("v{}", salt);
                    d.set_str(&key, &val).unwrap();
                    model.insert(key.clone(), val);
                }
                // Unset; repeated unsets of the same key are no-ops.
                1 => {
                    d.unset(&key);
                    model.remove(&key);
                }
                _ => unreachable!(),
            }
            prop_assert_eq!(d.get_str(&key), model.get(&key).map(String::as_str));
        }

        prop_assert_eq!(d.len(), model.len());
        for i in 0..140usize {
            let key = format!("k{}", i);
            prop_assert_eq!(d.get_str(&key), model.get(&key).map(String::as_str));
        }
    }
}
