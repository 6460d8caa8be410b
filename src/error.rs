//! Typed errors for dictionary mutation.

use thiserror::Error;

/// Errors surfaced by [`Dictionary::set`](crate::Dictionary::set) and its
/// typed variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// The empty string is reserved as "no key" and cannot be stored.
    #[error("Empty key")]
    EmptyKey,
    /// The value variant disagrees with the dictionary's current policy.
    #[error("Value kind does not match the dictionary's value policy")]
    KindMismatch,
    /// Growing the backing storage failed; the dictionary is unchanged.
    #[error("Allocation failed: requested capacity of {capacity} entries")]
    AllocFailed { capacity: usize },
}
