use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, U256};
use engine_primitives::{Builder, BuilderStatus};
use parking_lot::RwLock;

use crate::error::RegistryError;

/// Minimum stake required to register a builder: 1 ETH, denominated in wei.
pub const MIN_BUILDER_STAKE: u128 = 1_000_000_000_000_000_000;

/// The fields a builder supplies when registering, prior to stake validation and
/// index assignment.
#[derive(Debug, Clone)]
pub struct RegistrationMessage {
    pub bls_pubkey: Bytes,
    pub fee_recipient: Address,
    pub gas_limit: u64,
}

/// Staked builder registry: lifecycle (active/exiting/withdrawn), keyed by BLS
/// pubkey, with a sequentially assigned index per builder.
#[derive(Default)]
pub struct BuilderRegistry {
    inner: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    builders: HashMap<Bytes, Builder>,
    next_index: u64,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new builder. Fails if `stake` is below [`MIN_BUILDER_STAKE`] or
    /// if the pubkey is already registered (registration is idempotent-by-failure,
    /// not idempotent-by-no-op: a repeat call is an error, not a silent success).
    pub fn register(
        &self,
        message: RegistrationMessage,
        stake: U256,
        registration_time: u64,
    ) -> Result<Builder, RegistryError> {
        if stake < U256::from(MIN_BUILDER_STAKE) {
            return Err(RegistryError::InsufficientStake(stake));
        }

        let mut state = self.inner.write();
        if state.builders.contains_key(&message.bls_pubkey) {
            return Err(RegistryError::BuilderAlreadyExists);
        }

        let index = state.next_index;
        state.next_index += 1;

        let builder = Builder {
            index,
            bls_pubkey: message.bls_pubkey.clone(),
            fee_recipient: message.fee_recipient,
            gas_limit: message.gas_limit,
            balance: stake,
            status: BuilderStatus::Active,
            registration_time,
        };
        state.builders.insert(message.bls_pubkey, builder.clone());
        Ok(builder)
    }

    /// Transitions an active builder to exiting. Exiting builders cannot be
    /// unregistered again (no `exiting -> exiting` or `exiting -> withdrawn` here;
    /// withdrawal completion is a separate, out-of-scope stake-settlement step).
    pub fn unregister(&self, pubkey: &Bytes) -> Result<(), RegistryError> {
        let mut state = self.inner.write();
        let builder = state.builders.get_mut(pubkey).ok_or(RegistryError::BuilderNotFound)?;
        if builder.status != BuilderStatus::Active {
            return Err(RegistryError::BuilderNotActive);
        }
        builder.status = BuilderStatus::Exiting;
        Ok(())
    }

    pub fn builder(&self, pubkey: &Bytes) -> Option<Builder> {
        self.inner.read().builders.get(pubkey).cloned()
    }

    pub fn builders_by_status(&self, status: BuilderStatus) -> Vec<Builder> {
        self.inner.read().builders.values().filter(|b| b.status == status).cloned().collect()
    }

    /// Returns the builder if it is registered and active, an error otherwise.
    /// Used by [`crate::auction::SlotAuction::submit_bid`] to gate bid submission.
    pub(crate) fn require_active(&self, pubkey: &Bytes) -> Result<Builder, RegistryError> {
        let builder = self.builder(pubkey).ok_or(RegistryError::BuilderNotFound)?;
        if builder.status != BuilderStatus::Active {
            return Err(RegistryError::BuilderNotActive);
        }
        Ok(builder)
    }
}
