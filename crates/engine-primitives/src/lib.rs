//! Core data types for the execution-layer side of the Engine API: versioned
//! execution payloads and payload attributes, withdrawals, payload status, the
//! forkchoice state, the canonical JSON-RPC error-code table, and the builder/bid
//! domain types shared by the payload builder and the builder-auction crate.

mod attributes;
mod bid;
mod builder;
mod error;
mod forkchoice;
mod payload;
mod status;
mod withdrawal;

pub use attributes::{
    payload_id, PayloadAttributes, PayloadAttributesV1, PayloadAttributesV2, PayloadAttributesV3,
    PayloadAttributesV4,
};
pub use bid::ExecutionPayloadBid;
pub use builder::{Builder, BuilderStatus};
pub use error::{EngineApiError, ErrorCode};
pub use forkchoice::{ForkchoiceState, ForkchoiceUpdatedResult};
pub use payload::{
    BlobsBundleV1, ExecutionPayload, ExecutionPayloadV1, ExecutionPayloadV2, ExecutionPayloadV3,
    ExecutionPayloadV4, ExecutionPayloadV5, GetPayloadResponse, PayloadId,
};
pub use status::{PayloadStatus, PayloadStatusEnum};
pub use withdrawal::Withdrawal;

/// A 32-byte execution-layer hash, e.g. a block hash or state root.
pub type B256 = alloy_primitives::B256;
/// A 20-byte execution-layer account address.
pub type Address = alloy_primitives::Address;
/// A 256-byte logs bloom filter.
pub type Bloom = alloy_primitives::Bloom;
/// Opaque byte string, used for `extraData` and raw transaction/request bytes.
pub type Bytes = alloy_primitives::Bytes;
/// A 256-bit unsigned integer, used for `baseFeePerGas`, block value, and bid value.
pub type U256 = alloy_primitives::U256;
