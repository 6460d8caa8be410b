//! strdict: a string-keyed dictionary with an open-addressing index, lazy
//! (tombstone) deletion, and values that are either owned text or nested
//! dictionaries.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build Dictionary in small, verifiable layers so each piece can
//!   be reasoned about independently.
//! - Layers:
//!   - hash: a fixed 32-bit mixing hash over the key's bytes; bucket
//!     placement only, collisions are resolved by key comparison.
//!   - HashIndex: open-addressing probe table with three-state slots
//!     (empty / tombstone / occupied) and lazy deletion; caches each
//!     entry's hash so probing skips mismatches without touching the
//!     store.
//!   - EntryStore<V>: growable slot array owning keys and values;
//!     positions are stable for an entry's whole life, so the index
//!     references plain positions.
//!   - Dictionary: public API tying index + store + live count + value
//!     policy; owns growth orchestration and the typed get/set surface.
//!
//! Constraints
//! - Exclusive mutation through `&mut self`, shared reads through `&self`;
//!   no interior mutability anywhere in the crate.
//! - Keys are owned non-empty `String`s; the empty string is reserved as
//!   "no key" and rejected at the surface.
//! - Values are self-describing (`Value::Text` / `Value::Dict`). The
//!   dictionary's policy gates which kind `set` admits, never how stored
//!   data is read, so flipping the policy cannot corrupt anything.
//! - Ownership is strictly tree-shaped: a child dictionary has exactly one
//!   owning entry. `Dictionary` implements neither `Clone` nor a manual
//!   `Drop`; destruction is ordinary depth-first drop glue.
//!
//! Probing invariants
//! - Inserts claim the first empty or tombstone slot on the probe path.
//!   Lookups walk through tombstones and stop only at an empty slot or a
//!   matching occupied one. The asymmetry keeps an entry reachable when an
//!   earlier slot on its chain is freed.
//! - Slots never revert from tombstone to empty short of a full rebuild,
//!   and every probe is bounded to one full cycle of the table, so a
//!   churn-saturated index misses cleanly instead of spinning.
//!
//! Growth
//! - Triggered when the live count reaches capacity. A fresh index and the
//!   grown store are prepared first (fallible, `try_reserve`-based), every
//!   live key is rehashed into the fresh index, and only then is the old
//!   index replaced: growth fully succeeds or leaves the dictionary in its
//!   pre-growth state, reported as `SetError::AllocFailed`.
//!
//! Notes and non-goals
//! - Iteration and dump order is storage order: implementation-defined,
//!   not insertion order, not sorted.
//! - No persistence, no cross-thread mutation story beyond what owning
//!   plain data gives, no value kinds beyond text and nested.
//! - Diagnostics are typed errors and the `dump` sink; the crate does not
//!   log.
//! - Public API surface is `Dictionary`, `Value`, `ValuePolicy`, and
//!   `SetError`; lower layers are implementation details.

mod dictionary;
mod error;
mod hash;
mod index;
mod index_proptest;
mod store;

// Public surface
pub use dictionary::{Dictionary, Value, ValuePolicy};
pub use error::SetError;
