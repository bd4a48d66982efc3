use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A builder's bid for the right to produce the execution payload at a given
/// slot: the header summary a builder reveals before the winning payload body is
/// requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadBid {
    pub parent_block_hash: B256,
    pub parent_block_root: B256,
    pub block_hash: B256,
    pub prev_randao: B256,
    pub fee_recipient: Address,
    pub gas_limit: u64,
    pub builder_index: u64,
    pub slot: u64,
    /// Total value, denominated in wei, the builder is willing to pay for this
    /// slot, inclusive of both the consensus-layer bid and any direct payment
    /// transaction embedded in the payload.
    pub value: U256,
    /// Value delivered on-chain via a direct payment transaction embedded in the
    /// payload itself, as distinct from the off-chain bid commitment.
    pub execution_payment: U256,
    pub blob_kzg_commitments: Vec<Bytes>,
}
