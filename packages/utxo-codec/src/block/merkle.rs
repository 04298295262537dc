//! Merkle tree computation over transaction hashes.

use crate::bitcoin::hashes::{sha256d, Hash};

/// Compute the merkle root of a list of hashes in internal byte order.
///
/// Levels with an odd number of elements duplicate their last element. Returns `None`
/// for an empty list.
pub fn fast_merkle_root(hashes: &[[u8; 32]]) -> Option<[u8; 32]> {
    if hashes.is_empty() {
        return None;
    }

    let mut current_level = hashes.to_vec();
    while current_level.len() > 1 {
        current_level = current_level
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).unwrap_or(&pair[0]);
                let mut combined = [0u8; 64];
                combined[..32].copy_from_slice(&pair[0]);
                combined[32..].copy_from_slice(right);
                sha256d::Hash::hash(&combined).to_byte_array()
            })
            .collect();
    }
    Some(current_level[0])
}

/// `sha256d(witness_root ‖ witness_reserved_value)`
pub fn witness_commitment(witness_root: &[u8; 32], reserved_value: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(32 + reserved_value.len());
    data.extend_from_slice(witness_root);
    data.extend_from_slice(reserved_value);
    sha256d::Hash::hash(&data).to_byte_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(b: u8) -> [u8; 32] {
        [b; 32]
    }

    fn pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
        let mut combined = a.to_vec();
        combined.extend_from_slice(b);
        sha256d::Hash::hash(&combined).to_byte_array()
    }

    #[test]
    fn test_empty() {
        assert_eq!(fast_merkle_root(&[]), None);
    }

    #[test]
    fn test_single() {
        assert_eq!(fast_merkle_root(&[h(1)]), Some(h(1)));
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        let expected = pair(&pair(&h(1), &h(2)), &pair(&h(3), &h(3)));
        assert_eq!(fast_merkle_root(&[h(1), h(2), h(3)]), Some(expected));
        assert_eq!(fast_merkle_root(&[h(1), h(2), h(3), h(3)]), Some(expected));
    }

    #[test]
    fn test_witness_commitment() {
        assert_eq!(witness_commitment(&h(0), &[0u8; 32]), pair(&h(0), &h(0)));
    }
}
