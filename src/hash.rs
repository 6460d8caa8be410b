//! Key hashing: a 16-bit-block mixing hash for bucket placement.

/// Hashes a key to 32 bits for index placement. A port of Paul Hsieh's
/// SuperFastHash over the key's bytes.
///
/// Deterministic within a process, never cryptographic. Collisions are
/// resolved by comparing keys, so placement quality affects probe length,
/// not correctness. The empty string hashes to 0.
pub(crate) fn hash_key(key: &str) -> u32 {
    let data = key.as_bytes();
    if data.is_empty() {
        return 0;
    }

    let mut hash = data.len() as u32;

    let mut quads = data.chunks_exact(4);
    for quad in &mut quads {
        let lo = u16::from_le_bytes([quad[0], quad[1]]) as u32;
        let hi = u16::from_le_bytes([quad[2], quad[3]]) as u32;
        hash = hash.wrapping_add(lo);
        let tmp = (hi << 11) ^ hash;
        hash = (hash << 16) ^ tmp;
        hash = hash.wrapping_add(hash >> 11);
    }

    match *quads.remainder() {
        [a, b, c] => {
            hash = hash.wrapping_add(u16::from_le_bytes([a, b]) as u32);
            hash ^= hash << 16;
            hash ^= (c as u32) << 18;
            hash = hash.wrapping_add(hash >> 11);
        }
        [a, b] => {
            hash = hash.wrapping_add(u16::from_le_bytes([a, b]) as u32);
            hash ^= hash << 11;
            hash = hash.wrapping_add(hash >> 17);
        }
        [a] => {
            hash = hash.wrapping_add(a as u32);
            hash ^= hash << 10;
            hash = hash.wrapping_add(hash >> 1);
        }
        _ => {}
    }

    // Final avalanche
    hash ^= hash << 3;
    hash = hash.wrapping_add(hash >> 5);
    hash ^= hash << 4;
    hash = hash.wrapping_add(hash >> 17);
    hash ^= hash << 25;
    hash = hash.wrapping_add(hash >> 6);

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Invariant: equal inputs hash equal; the hash holds no hidden state.
    #[test]
    fn deterministic_across_calls() {
        for key in ["", "a", "ab", "abc", "abcd", "abcde", "Pictures:resolution"] {
            assert_eq!(hash_key(key), hash_key(key), "key {:?}", key);
        }
    }

    /// Invariant: the empty string hashes to 0.
    #[test]
    fn empty_key_hashes_to_zero() {
        assert_eq!(hash_key(""), 0);
    }

    /// Invariant: short adjacent keys spread into distinct hashes. Not a
    /// guarantee of the function, but a collision among a handful of short
    /// ASCII keys would make every probe chain degenerate.
    #[test]
    fn adjacent_short_keys_differ() {
        let hashes: BTreeSet<u32> = (0..16).map(|i| hash_key(&format!("k{}", i))).collect();
        assert_eq!(hashes.len(), 16);
    }

    /// Invariant: non-ASCII input is hashed over its UTF-8 bytes, including
    /// lengths that land on every tail-byte case.
    #[test]
    fn non_ascii_input_accepted() {
        for key in ["é", "éa", "café", "naïve", "ключ", "鍵"] {
            assert_eq!(hash_key(key), hash_key(key), "key {:?}", key);
        }
    }
}
