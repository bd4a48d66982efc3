use alloy_primitives::B256;
use sha2::{Digest, Sha256};

/// EIP-4844 versioned hash of a KZG commitment: `0x01 ‖ sha256(commitment)[1..]`.
pub fn versioned_hash(commitment: &[u8]) -> B256 {
    let digest = Sha256::digest(commitment);
    let mut out = [0u8; 32];
    out[0] = 0x01;
    out[1..].copy_from_slice(&digest[1..]);
    B256::from(out)
}
