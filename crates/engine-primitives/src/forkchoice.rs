use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::{payload::PayloadId, PayloadStatus};

/// The consensus layer's view of the canonical chain head, as carried by every
/// `engine_forkchoiceUpdatedVN` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceState {
    pub head_block_hash: B256,
    pub safe_block_hash: B256,
    pub finalized_block_hash: B256,
}

/// The `engine_forkchoiceUpdatedVN` response: always a [`PayloadStatus`], plus a
/// [`PayloadId`] when the call also requested a payload build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceUpdatedResult {
    pub payload_status: PayloadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_id: Option<PayloadId>,
}
