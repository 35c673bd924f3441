//! Merkle commitment.
//!
//! Root hash of an ordered list of transaction hashes. Leaves are the
//! base-16-encoded transaction hashes (not the raw digest bytes) — this
//! matters for interoperability, since two implementations that agree on
//! hex encoding but differ on raw-byte endianness would otherwise diverge.
//!
//! Grounded on `dmrl789-IPPAN/crates/crypto/src/merkle_trees.rs`'s
//! `build_tree` (pairwise hash-up with last-leaf duplication on odd
//! levels), trimmed to just the root since the validator never needs
//! inclusion proofs.

use crate::crypto::{hash, Digest};

/// Computes the Merkle root over the hex-encoded transaction hashes.
///
/// An empty list produces the well-known empty-tree constant `hash(b"")`.
/// Otherwise leaves are paired left-to-right, the last leaf is duplicated
/// when a level has an odd count, and `hash(left || right)` is computed
/// until a single root remains.
pub fn merkle_root(tx_hashes_hex: &[String]) -> Digest {
    if tx_hashes_hex.is_empty() {
        return hash(b"");
    }

    let mut level: Vec<Digest> = tx_hashes_hex.iter().map(|h| hash(h.as_bytes())).collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut i = 0;
        while i < level.len() {
            let left = level[i];
            let right = if i + 1 < level.len() {
                level[i + 1]
            } else {
                level[i]
            };
            let mut combined = Vec::with_capacity(64);
            combined.extend_from_slice(left.as_bytes());
            combined.extend_from_slice(right.as_bytes());
            next.push(hash(&combined));
            i += 2;
        }
        level = next;
    }

    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_well_known_constant() {
        assert_eq!(merkle_root(&[]), hash(b""));
    }

    #[test]
    fn single_leaf_root_is_hash_of_that_leaf() {
        let leaves = vec!["deadbeef".to_string()];
        assert_eq!(merkle_root(&leaves), hash(b"deadbeef"));
    }

    #[test]
    fn odd_count_duplicates_last_leaf() {
        let leaves = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let h_a = hash(b"a");
        let h_b = hash(b"b");
        let h_c = hash(b"c");

        let mut ab = Vec::new();
        ab.extend_from_slice(h_a.as_bytes());
        ab.extend_from_slice(h_b.as_bytes());
        let node_ab = hash(&ab);

        let mut cc = Vec::new();
        cc.extend_from_slice(h_c.as_bytes());
        cc.extend_from_slice(h_c.as_bytes());
        let node_cc = hash(&cc);

        let mut top = Vec::new();
        top.extend_from_slice(node_ab.as_bytes());
        top.extend_from_slice(node_cc.as_bytes());
        let expected = hash(&top);

        assert_eq!(merkle_root(&leaves), expected);
    }

    #[test]
    fn order_matters() {
        let forward = vec!["a".to_string(), "b".to_string()];
        let reversed = vec!["b".to_string(), "a".to_string()];
        assert_ne!(merkle_root(&forward), merkle_root(&reversed));
    }
}
