//! Deterministic list commitments.

use alloy_primitives::B256;
use commonware_cryptography::{Hasher as _, Sha256};

const LEAF_PREFIX: u8 = 0x00;
const INNER_PREFIX: u8 = 0x01;

/// SHA-256 of the given bytes as a `B256`.
pub fn sha256(data: &[u8]) -> B256 {
    let mut hasher = Sha256::default();
    hasher.update(data);
    B256::from_slice(hasher.finalize().as_ref())
}

/// Root of an RFC 6962 binary merkle tree over the given leaves.
///
/// Leaf and inner nodes are domain-separated; the empty list hashes to the
/// hash of the empty string. Followers recompute identical roots from
/// identical leaf encodings.
pub fn merkle_root(leaves: &[impl AsRef<[u8]>]) -> B256 {
    match leaves.len() {
        0 => sha256(&[]),
        1 => leaf_hash(leaves[0].as_ref()),
        n => {
            let k = split_point(n);
            inner_hash(&merkle_root(&leaves[..k]), &merkle_root(&leaves[k..]))
        }
    }
}

fn leaf_hash(leaf: &[u8]) -> B256 {
    let mut hasher = Sha256::default();
    hasher.update(&[LEAF_PREFIX]);
    hasher.update(leaf);
    B256::from_slice(hasher.finalize().as_ref())
}

fn inner_hash(left: &B256, right: &B256) -> B256 {
    let mut hasher = Sha256::default();
    hasher.update(&[INNER_PREFIX]);
    hasher.update(left.as_slice());
    hasher.update(right.as_slice());
    B256::from_slice(hasher.finalize().as_ref())
}

/// Largest power of two strictly less than `n`.
fn split_point(n: usize) -> usize {
    debug_assert!(n > 1);
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}
