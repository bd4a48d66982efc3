use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a registered builder in the builder-auction registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderStatus {
    /// Staked and eligible to submit bids.
    Active,
    /// Requested withdrawal; still eligible until its exit slot passes.
    Exiting,
    /// Stake fully withdrawn; no longer eligible to bid.
    Withdrawn,
}

/// A staked entrant in the builder-auction registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Builder {
    /// Index assigned sequentially at registration time.
    pub index: u64,
    /// BLS public key identifying the builder, treated here as an opaque blob.
    pub bls_pubkey: alloy_primitives::Bytes,
    /// Address credited with the builder's stake and execution payments.
    pub fee_recipient: Address,
    /// Self-declared per-block gas limit preference.
    pub gas_limit: u64,
    /// Current stake balance, denominated in wei.
    pub balance: U256,
    pub status: BuilderStatus,
    /// Unix timestamp at which this builder was registered.
    pub registration_time: u64,
}
