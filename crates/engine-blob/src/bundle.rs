use alloy_primitives::Bytes;

use crate::{config::BlobScheduleConfig, error::BlobValidationError, sidecar::KzgVerifier};

/// Three parallel sequences — commitments, proofs, blobs — of equal length, built
/// up incrementally while a payload is under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobsBundle {
    pub commitments: Vec<Bytes>,
    pub proofs: Vec<Bytes>,
    pub blobs: Vec<Bytes>,
}

impl BlobsBundle {
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }
}

/// Incrementally assembles a [`BlobsBundle`], verifying each blob against the
/// configured capacity and, if a [`KzgVerifier`] is supplied, against its proof.
pub struct BlobsBundleBuilder<'a> {
    config: BlobScheduleConfig,
    verifier: Option<&'a dyn KzgVerifier>,
    bundle: BlobsBundle,
}

impl<'a> BlobsBundleBuilder<'a> {
    pub fn new(config: BlobScheduleConfig, verifier: Option<&'a dyn KzgVerifier>) -> Self {
        Self { config, verifier, bundle: BlobsBundle::default() }
    }

    /// Adds one blob/commitment/proof triple. This is the one suspension point in
    /// the blob subsystem: KZG verification may run synchronously here when a
    /// verifier is configured.
    pub fn add_blob(
        &mut self,
        commitment: Bytes,
        proof: Bytes,
        blob: Bytes,
    ) -> Result<(), BlobValidationError> {
        if self.bundle.len() as u64 >= self.config.max_blobs_per_block {
            return Err(BlobValidationError::BundleCapacityExceeded(self.config.max_blobs_per_block));
        }

        if let Some(verifier) = self.verifier {
            if !verifier.verify(&commitment, &blob, &proof) {
                return Err(BlobValidationError::CommitmentBlobMismatch(
                    crate::hash::versioned_hash(&commitment),
                ));
            }
        }

        self.bundle.commitments.push(commitment);
        self.bundle.proofs.push(proof);
        self.bundle.blobs.push(blob);
        Ok(())
    }

    pub fn build(self) -> BlobsBundle {
        self.bundle
    }
}
