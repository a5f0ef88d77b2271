//! Canonical submission payload hashing.

use sha3::{Digest, Keccak256};
use shared_types::{FeeBps, Hash, NodeId};

/// Keccak-256 over the canonical encoding of a submission's content.
///
/// The encoding is length-prefixed so `([1], [2])` and `([1, 2], [])` can
/// never collide. The same payload from the same node always hashes
/// identically, which is exactly what the replay cache keys on.
pub fn submission_hash(node_id: &NodeId, cex_fees: &[FeeBps], dex_fees: &[FeeBps], nonce: u64) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(node_id);
    hasher.update((cex_fees.len() as u64).to_be_bytes());
    for &fee in cex_fees {
        hasher.update(fee.to_be_bytes());
    }
    hasher.update((dex_fees.len() as u64).to_be_bytes());
    for &fee in dex_fees {
        hasher.update(fee.to_be_bytes());
    }
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}
