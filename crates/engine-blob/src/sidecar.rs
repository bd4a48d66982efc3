use alloy_primitives::{Bytes, B256};

use crate::{config::BlobScheduleConfig, error::BlobValidationError, hash::versioned_hash};

/// A single blob's commitment, KZG proof, and raw bytes, plus its index within the
/// block's blob sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTransactionSidecar {
    pub index: u64,
    pub commitment: Bytes,
    pub proof: Bytes,
    pub blob: Bytes,
}

/// The subset of a transaction's shape the blob validator needs. Transaction
/// decoding itself is a backend concern; implementations typically wrap whatever
/// transaction type the embedder's EVM crate provides.
pub trait BlobTransactionLike {
    fn is_blob_transaction(&self) -> bool;
    fn blob_versioned_hashes(&self) -> &[B256];
}

/// Checks sidecar indices form a contiguous `0..N-1` range, every commitment is
/// non-zero, `N ≤ maxBlobsPerBlock`, and the versioned hashes derived from the
/// sidecars (in index order) equal `expected_hashes` exactly.
pub fn validate_sidecars(
    sidecars: &[BlobTransactionSidecar],
    expected_hashes: &[B256],
    config: &BlobScheduleConfig,
) -> Result<(), BlobValidationError> {
    if sidecars.len() as u64 > config.max_blobs_per_block {
        return Err(BlobValidationError::TooManyBlobs(sidecars.len(), config.max_blobs_per_block));
    }

    let mut sorted: Vec<&BlobTransactionSidecar> = sidecars.iter().collect();
    sorted.sort_by_key(|s| s.index);
    for (expected_index, sidecar) in sorted.iter().enumerate() {
        if sidecar.index != expected_index as u64 {
            return Err(BlobValidationError::NonContiguousIndices);
        }
        if sidecar.commitment.iter().all(|b| *b == 0) {
            return Err(BlobValidationError::ZeroCommitment(sidecar.index));
        }
    }

    let derived: Vec<B256> = sorted.iter().map(|s| versioned_hash(&s.commitment)).collect();
    if derived != expected_hashes {
        return Err(BlobValidationError::VersionedHashListMismatch);
    }

    Ok(())
}

/// Pluggable KZG proof verifier; `None` callers only get the structural checks
/// above, `Some` callers additionally get cryptographic commitment/blob/proof
/// consistency.
pub trait KzgVerifier {
    fn verify(&self, commitment: &[u8], blob: &[u8], proof: &[u8]) -> bool;
}

/// Checks that `commitments` and `blobs` are equal length and, when a verifier is
/// supplied, that each commitment/blob pair is cryptographically consistent.
pub fn validate_commitments(
    commitments: &[Bytes],
    blobs: &[Bytes],
    proofs: &[Bytes],
    verifier: Option<&dyn KzgVerifier>,
) -> Result<(), BlobValidationError> {
    if commitments.len() != blobs.len() || commitments.len() != proofs.len() {
        return Err(BlobValidationError::UnevenBundleLengths);
    }

    if let Some(verifier) = verifier {
        for ((commitment, blob), proof) in commitments.iter().zip(blobs).zip(proofs) {
            if !verifier.verify(commitment, blob, proof) {
                return Err(BlobValidationError::CommitmentBlobMismatch(versioned_hash(commitment)));
            }
        }
    }

    Ok(())
}

/// Fails when `tx` is not a blob-carrying transaction, when `sidecar.index` is out
/// of bounds for `tx`'s declared blob hashes, or when the sidecar's derived
/// versioned hash disagrees with the transaction's declared hash at that index.
pub fn validate_transaction_sidecar(
    tx: &impl BlobTransactionLike,
    sidecar: &BlobTransactionSidecar,
) -> Result<(), BlobValidationError> {
    if !tx.is_blob_transaction() {
        return Err(BlobValidationError::NotBlobTransaction);
    }

    let hashes = tx.blob_versioned_hashes();
    let declared = hashes.get(sidecar.index as usize).copied().ok_or(
        BlobValidationError::SidecarIndexOutOfBounds {
            index: sidecar.index,
            hash_count: hashes.len(),
        },
    )?;

    let derived = versioned_hash(&sidecar.commitment);
    if derived != declared {
        return Err(BlobValidationError::VersionedHashMismatch(sidecar.index));
    }

    Ok(())
}

/// Fails when the number of sidecars does not equal the total number of blob
/// hashes declared across the block's transactions.
pub fn verify_sidecar_count(
    sidecars: &[BlobTransactionSidecar],
    txs: &[impl BlobTransactionLike],
) -> Result<(), BlobValidationError> {
    let expected: usize = txs.iter().map(|tx| tx.blob_versioned_hashes().len()).sum();
    if sidecars.len() != expected {
        return Err(BlobValidationError::SidecarCountMismatch { expected, actual: sidecars.len() });
    }
    Ok(())
}
