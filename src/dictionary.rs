//! Dictionary: the policy layer tying entry store, hash index, and growth.

use std::io;

use crate::error::SetError;
use crate::hash::hash_key;
use crate::index::{HashIndex, Hit};
use crate::store::{Entry, EntryStore};

/// Smallest entry capacity ever allocated; size hints below this are
/// rounded up.
const MIN_CAPACITY: usize = 128;

/// An owned dictionary value: flat text or a nested dictionary. The variant
/// is self-describing, so a policy flip can never misread stored data.
#[derive(Debug)]
pub enum Value {
    Text(String),
    Dict(Box<Dictionary>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn dict(d: Dictionary) -> Self {
        Value::Dict(Box::new(d))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Dict(_) => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dict(d) => Some(d),
            Value::Text(_) => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Value::Dict(d) => Some(d),
            Value::Text(_) => None,
        }
    }
}

/// Ownership mode for stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Values are owned strings, duplicated on insert.
    Text,
    /// Values are child dictionaries, owned by their entry and dropped
    /// recursively with the parent.
    Nested,
}

impl ValuePolicy {
    fn admits(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValuePolicy::Text, Value::Text(_)) | (ValuePolicy::Nested, Value::Dict(_))
        )
    }
}

/// A string-keyed container with open-addressing lookup and lazy deletion.
///
/// Keys are owned non-empty strings; values are [`Value`]s or absent. A live
/// key with an absent value counts toward [`len`](Dictionary::len) and shows
/// up in [`dump`](Dictionary::dump), but reads as a miss. Dropping a
/// dictionary drops every entry, recursively through nested children.
#[derive(Debug)]
pub struct Dictionary {
    store: EntryStore<Value>,
    index: HashIndex,
    live: usize,
    policy: ValuePolicy,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a dictionary with room for at least `size_hint` entries
    /// before the first growth. Hints below the minimum floor are rounded
    /// up to it.
    pub fn with_capacity(size_hint: usize) -> Self {
        let capacity = size_hint.max(MIN_CAPACITY);
        Self {
            store: EntryStore::with_capacity(capacity),
            index: HashIndex::with_entry_capacity(capacity),
            live: 0,
            policy: ValuePolicy::Text,
        }
    }

    pub fn policy(&self) -> ValuePolicy {
        self.policy
    }

    /// Selects the value kind future `set` calls accept. Stored values are
    /// untouched: each one carries its own variant.
    pub fn set_policy(&mut self, policy: ValuePolicy) {
        self.policy = policy;
    }

    pub fn len(&self) -> usize {
        self.live
    }
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn probe(&self, key: &str, hash: u32) -> Option<Hit> {
        self.index.find(hash, |entry| {
            self.store
                .get(entry)
                .map(|e| e.key == key)
                .unwrap_or(false)
        })
    }

    /// Looks up the value stored under `key`. Misses on an absent or empty
    /// key, and on a live key whose value is absent; callers pick their own
    /// default with `unwrap_or`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }
        let hit = self.probe(key, hash_key(key))?;
        self.store.get(hit.entry).and_then(|e| e.value.as_ref())
    }

    /// Text value under `key`, if the key is live and holds text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Child dictionary under `key`, if the key is live and holds one.
    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Value::as_dict)
    }

    /// Mutable child dictionary under `key`, for filling a nested level in
    /// place.
    pub fn get_dict_mut(&mut self, key: &str) -> Option<&mut Dictionary> {
        if key.is_empty() {
            return None;
        }
        let hit = self.probe(key, hash_key(key))?;
        self.store
            .get_mut(hit.entry)
            .and_then(|e| e.value.as_mut())
            .and_then(Value::as_dict_mut)
    }

    /// Stores `value` under `key`, taking ownership. An existing key has its
    /// old value dropped in place (recursively for a nested child) and the
    /// live count is unchanged; a new key claims an entry slot and an index
    /// slot, growing the dictionary first when it is full.
    ///
    /// `set(key, None)` keeps the key live but makes reads miss, which is
    /// deletion as far as `get` is concerned.
    ///
    /// Fails on an empty key, on a value whose kind the current policy does
    /// not admit, and on allocation failure during growth. Failure never
    /// mutates the dictionary.
    pub fn set(&mut self, key: &str, value: Option<Value>) -> Result<(), SetError> {
        if key.is_empty() {
            return Err(SetError::EmptyKey);
        }
        if let Some(v) = &value {
            if !self.policy.admits(v) {
                return Err(SetError::KindMismatch);
            }
        }

        let hash = hash_key(key);
        if let Some(hit) = self.probe(key, hash) {
            let entry = self
                .store
                .get_mut(hit.entry)
                .expect("an occupied index slot must reference a live entry");
            entry.value = value;
            return Ok(());
        }

        if self.live == self.store.capacity() {
            self.grow()?;
        }

        let slot = self.store.find_free(self.live);
        self.store.install(
            slot,
            Entry {
                key: key.to_owned(),
                value,
            },
        );
        self.index.claim(hash, slot);
        self.live += 1;
        Ok(())
    }

    /// Stores an owned copy of a text value under `key`.
    pub fn set_str(&mut self, key: &str, value: &str) -> Result<(), SetError> {
        self.set(key, Some(Value::text(value)))
    }

    /// Stores `child` under `key`, taking ownership of it.
    pub fn set_dict(&mut self, key: &str, child: Dictionary) -> Result<(), SetError> {
        self.set(key, Some(Value::dict(child)))
    }

    /// Removes `key`: the entry's key and value are dropped (recursively for
    /// a nested child) and the index slot becomes a tombstone. A miss is a
    /// no-op, so a second unset of the same key changes nothing.
    pub fn unset(&mut self, key: &str) {
        if key.is_empty() {
            return;
        }
        if let Some(hit) = self.probe(key, hash_key(key)) {
            self.index.release(hit.slot);
            // The released entry drops here: key, value, and any nested
            // dictionary below it.
            self.store
                .release(hit.entry)
                .expect("an occupied index slot must reference a live entry");
            self.live -= 1;
        }
    }

    /// Live entries with present values, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.store
            .iter_live()
            .filter_map(|(_, e)| e.value.as_ref().map(|v| (e.key.as_str(), v)))
    }

    /// Writes one `key = value` line per live entry in storage order, with
    /// `UNDEF` standing in for an absent value. A dictionary with no live
    /// entries writes `empty dictionary`; one in nested mode writes
    /// `invalid dictionary`, since children are not printable as flat text.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        if self.live == 0 {
            return writeln!(out, "empty dictionary");
        }
        if self.policy == ValuePolicy::Nested {
            return writeln!(out, "invalid dictionary");
        }
        for (_, entry) in self.store.iter_live() {
            match &entry.value {
                Some(Value::Text(s)) => writeln!(out, "{} = {}", entry.key, s)?,
                Some(Value::Dict(_)) => writeln!(out, "{} = <dictionary>", entry.key)?,
                None => writeln!(out, "{} = UNDEF", entry.key)?,
            }
        }
        Ok(())
    }

    /// Doubles capacity all-or-nothing: the rebuilt index and the grown
    /// store are both prepared before the old index is replaced, so a failed
    /// allocation leaves the dictionary exactly as it was.
    fn grow(&mut self) -> Result<(), SetError> {
        let new_capacity = self.store.capacity() * 2;

        let mut index = HashIndex::try_with_entry_capacity(new_capacity)
            .map_err(|_| SetError::AllocFailed { capacity: new_capacity })?;
        self.store
            .grow_double()
            .map_err(|_| SetError::AllocFailed { capacity: new_capacity })?;

        // Re-place every live entry in the fresh index; tombstones do not
        // survive a rebuild.
        for (slot, entry) in self.store.iter_live() {
            index.claim(hash_key(&entry.key), slot);
        }
        self.index = index;

        #[cfg(debug_assertions)]
        self.check_consistency();
        Ok(())
    }

    /// Cross-checks the index against the store: every occupied index slot
    /// references a distinct live entry and caches its current hash, and
    /// occupancy equals the live count. Runs automatically after growth in
    /// debug builds; tests call it at their own checkpoints.
    pub(crate) fn check_consistency(&self) {
        use crate::index::Slot;

        let mut seen = vec![false; self.store.capacity()];
        let mut occupied = 0;
        for slot in self.index.slots() {
            if let Slot::Occupied { hash, entry } = *slot {
                occupied += 1;
                let e = self
                    .store
                    .get(entry)
                    .expect("occupied index slot references a free entry slot");
                assert_eq!(hash, hash_key(&e.key), "cached hash out of date");
                assert!(!seen[entry], "entry referenced by two index slots");
                seen[entry] = true;
            }
        }
        assert_eq!(occupied, self.live, "index occupancy != live count");
        assert_eq!(self.store.iter_live().count(), self.live);
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
