use alloy_primitives::{Bytes, U256};

use crate::{
    error::{BidError, RegistryError},
    registry::{BuilderRegistry, RegistrationMessage},
    auction::SlotAuction,
};
use engine_primitives::{Builder, ExecutionPayloadBid};

/// BLS signature verification is treated as an opaque, pluggable capability: the
/// registry and auction never implement curve arithmetic themselves, they only
/// ask this trait whether a `(pubkey, message, signature)` triple is consistent.
pub trait BlsVerifier: Send + Sync {
    fn verify(&self, pubkey: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

/// A registration message together with the raw bytes that were signed and the
/// signature over them.
#[derive(Debug, Clone)]
pub struct SignedRegistrationMessage {
    pub message: RegistrationMessage,
    pub signing_root: Bytes,
    pub signature: Bytes,
}

/// A bid together with the raw bytes that were signed and the signature over them.
#[derive(Debug, Clone)]
pub struct SignedBid {
    pub bid: ExecutionPayloadBid,
    pub signing_root: Bytes,
    pub signature: Bytes,
}

/// Verifies `signed.signature` against `signed.message.bls_pubkey` before
/// delegating to [`BuilderRegistry::register`]. Rejects with
/// [`RegistryError::InvalidSignature`] on a failed verification, without ever
/// touching the registry state.
pub fn register_signed(
    registry: &BuilderRegistry,
    signed: SignedRegistrationMessage,
    stake: U256,
    registration_time: u64,
    verifier: &dyn BlsVerifier,
) -> Result<Builder, RegistryError> {
    if !verifier.verify(&signed.message.bls_pubkey, &signed.signing_root, &signed.signature) {
        return Err(RegistryError::InvalidSignature);
    }
    registry.register(signed.message, stake, registration_time)
}

/// Verifies `signed.signature` against the submitting builder's registered
/// pubkey before delegating to [`SlotAuction::submit_bid`].
pub fn submit_bid_signed(
    auction: &SlotAuction,
    builder_pubkey: &Bytes,
    signed: SignedBid,
    verifier: &dyn BlsVerifier,
) -> Result<(), BidError> {
    if !verifier.verify(builder_pubkey, &signed.signing_root, &signed.signature) {
        return Err(BidError::InvalidSignature);
    }
    auction.submit_bid(builder_pubkey, signed.bid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MIN_BUILDER_STAKE;
    use alloy_primitives::{Address, B256};
    use std::sync::Arc;

    struct AlwaysValid;
    impl BlsVerifier for AlwaysValid {
        fn verify(&self, _: &[u8], _: &[u8], _: &[u8]) -> bool {
            true
        }
    }

    struct AlwaysInvalid;
    impl BlsVerifier for AlwaysInvalid {
        fn verify(&self, _: &[u8], _: &[u8], _: &[u8]) -> bool {
            false
        }
    }

    fn registration(pubkey: u8) -> SignedRegistrationMessage {
        SignedRegistrationMessage {
            message: RegistrationMessage {
                bls_pubkey: Bytes::from(vec![pubkey; 48]),
                fee_recipient: Address::ZERO,
                gas_limit: 30_000_000,
            },
            signing_root: Bytes::from(vec![0xAB; 32]),
            signature: Bytes::from(vec![0xCD; 96]),
        }
    }

    #[test]
    fn register_signed_rejects_bad_signature() {
        let registry = BuilderRegistry::new();
        let err = register_signed(
            &registry,
            registration(1),
            U256::from(MIN_BUILDER_STAKE),
            0,
            &AlwaysInvalid,
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::InvalidSignature);
    }

    #[test]
    fn register_signed_accepts_good_signature() {
        let registry = BuilderRegistry::new();
        let builder = register_signed(
            &registry,
            registration(1),
            U256::from(MIN_BUILDER_STAKE),
            0,
            &AlwaysValid,
        )
        .unwrap();
        assert_eq!(builder.index, 0);
    }

    #[test]
    fn submit_bid_signed_rejects_bad_signature() {
        let registry = Arc::new(BuilderRegistry::new());
        let pubkey = Bytes::from(vec![1u8; 48]);
        registry
            .register(
                RegistrationMessage {
                    bls_pubkey: pubkey.clone(),
                    fee_recipient: Address::ZERO,
                    gas_limit: 30_000_000,
                },
                U256::from(MIN_BUILDER_STAKE),
                0,
            )
            .unwrap();
        let auction = SlotAuction::new(registry);

        let signed = SignedBid {
            bid: ExecutionPayloadBid {
                parent_block_hash: B256::repeat_byte(1),
                parent_block_root: B256::ZERO,
                block_hash: B256::repeat_byte(2),
                prev_randao: B256::ZERO,
                fee_recipient: Address::ZERO,
                gas_limit: 30_000_000,
                builder_index: 0,
                slot: 1,
                value: U256::from(10),
                execution_payment: U256::ZERO,
                blob_kzg_commitments: vec![],
            },
            signing_root: Bytes::from(vec![0xAB; 32]),
            signature: Bytes::from(vec![0xCD; 96]),
        };

        let err = submit_bid_signed(&auction, &pubkey, signed, &AlwaysInvalid).unwrap_err();
        assert_eq!(err, BidError::InvalidSignature);
    }
}
