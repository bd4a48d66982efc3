//! Structural and cryptographic validation of EIP-4844 blob sidecars, versioned-hash
//! derivation, and the blob-gas / blob-base-fee recurrences.

mod bundle;
mod config;
mod error;
mod gas;
mod hash;
mod sidecar;

pub use bundle::{BlobsBundle, BlobsBundleBuilder};
pub use config::BlobScheduleConfig;
pub use error::BlobValidationError;
pub use gas::{compute_blob_base_fee, compute_blob_gas, compute_excess_blob_gas};
pub use hash::versioned_hash;
pub use sidecar::{
    validate_commitments, validate_sidecars, validate_transaction_sidecar, verify_sidecar_count,
    BlobTransactionSidecar, BlobTransactionLike,
};
