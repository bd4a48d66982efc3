use alloy_primitives::B256;
use thiserror::Error;

/// Failures surfaced by the blob/sidecar validation pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlobValidationError {
    #[error("sidecar indices are not a contiguous 0..N-1 range")]
    NonContiguousIndices,
    #[error("sidecar commitment at index {0} is zero")]
    ZeroCommitment(u64),
    #[error("{0} sidecars exceed the maximum of {1} blobs per block")]
    TooManyBlobs(usize, u64),
    #[error("transaction is not a blob-carrying transaction")]
    NotBlobTransaction,
    #[error("sidecar index {index} out of bounds for {hash_count} declared blob hashes")]
    SidecarIndexOutOfBounds { index: u64, hash_count: usize },
    #[error("derived versioned hash does not match the transaction's declared hash at index {0}")]
    VersionedHashMismatch(u64),
    #[error("sidecar count {actual} does not match {expected} declared blob hashes across the block")]
    SidecarCountMismatch { expected: usize, actual: usize },
    #[error("block's blob versioned hashes do not match the CL-supplied expected list")]
    VersionedHashListMismatch,
    #[error("commitments/proofs/blobs sequences have mismatched lengths")]
    UnevenBundleLengths,
    #[error("bundle would exceed the maximum of {0} blobs")]
    BundleCapacityExceeded(u64),
    #[error("commitment does not match the accompanying blob")]
    CommitmentBlobMismatch(B256),
}
