use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::Withdrawal;

/// Deterministic 8-byte identifier for a payload build job, derived by
/// [`crate::payload_id`] from the build attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadId(#[serde(with = "payload_id_hex")] [u8; 8]);

impl PayloadId {
    /// Wraps a raw 8-byte identifier.
    pub const fn new(id: [u8; 8]) -> Self {
        Self(id)
    }

    /// Returns the identifier bytes.
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl std::fmt::Display for PayloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

mod payload_id_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &[u8; 8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; 8], D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("payload id must be 8 bytes"))
    }
}

/// Minimal hex helpers, avoiding a dependency on the `hex` crate's feature-gated
/// serde integration.
mod hex {
    pub(crate) fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub(crate) fn decode(s: &str) -> Result<Vec<u8>, String> {
        if s.len() % 2 != 0 {
            return Err("odd length hex string".to_string());
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string()))
            .collect()
    }
}

/// Engine-API V1 execution payload (pre-Shanghai): no withdrawals, no blob fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV1 {
    pub parent_hash: B256,
    pub fee_recipient: Address,
    pub state_root: B256,
    pub receipts_root: B256,
    pub logs_bloom: Bloom,
    pub prev_randao: B256,
    #[serde(with = "alloy_serde_quantity")]
    pub block_number: u64,
    #[serde(with = "alloy_serde_quantity")]
    pub gas_limit: u64,
    #[serde(with = "alloy_serde_quantity")]
    pub gas_used: u64,
    #[serde(with = "alloy_serde_quantity")]
    pub timestamp: u64,
    pub extra_data: Bytes,
    pub base_fee_per_gas: U256,
    pub block_hash: B256,
    pub transactions: Vec<Bytes>,
}

/// V2: adds Shanghai withdrawals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV2 {
    #[serde(flatten)]
    pub payload_inner: ExecutionPayloadV1,
    pub withdrawals: Vec<Withdrawal>,
}

/// V3: adds Cancun blob-gas accounting fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV3 {
    #[serde(flatten)]
    pub payload_inner: ExecutionPayloadV2,
    #[serde(with = "alloy_serde_quantity")]
    pub blob_gas_used: u64,
    #[serde(with = "alloy_serde_quantity")]
    pub excess_blob_gas: u64,
}

/// V4: adds the Prague execution-requests list, each entry an opaque byte string
/// prefixed with its request-type byte (see `engine-requests`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV4 {
    #[serde(flatten)]
    pub payload_inner: ExecutionPayloadV3,
    pub execution_requests: Vec<Bytes>,
}

/// V5: adds the opaque block access list, carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV5 {
    #[serde(flatten)]
    pub payload_inner: ExecutionPayloadV4,
    pub block_access_list: Bytes,
}

/// The five concrete payload shapes a `engine_newPayloadVN` call may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionPayload {
    V1(ExecutionPayloadV1),
    V2(ExecutionPayloadV2),
    V3(ExecutionPayloadV3),
    V4(ExecutionPayloadV4),
    V5(ExecutionPayloadV5),
}

impl ExecutionPayload {
    /// The inner V1 fields, present in every version.
    pub fn as_v1(&self) -> &ExecutionPayloadV1 {
        match self {
            Self::V1(p) => p,
            Self::V2(p) => &p.payload_inner,
            Self::V3(p) => &p.payload_inner.payload_inner,
            Self::V4(p) => &p.payload_inner.payload_inner.payload_inner,
            Self::V5(p) => &p.payload_inner.payload_inner.payload_inner.payload_inner,
        }
    }

    pub fn block_hash(&self) -> B256 {
        self.as_v1().block_hash
    }

    pub fn parent_hash(&self) -> B256 {
        self.as_v1().parent_hash
    }

    pub fn execution_requests(&self) -> Option<&[Bytes]> {
        match self {
            Self::V4(p) => Some(&p.execution_requests),
            Self::V5(p) => Some(&p.payload_inner.execution_requests),
            _ => None,
        }
    }
}

/// A single blob's KZG commitment, proof, and raw contents, as returned alongside a
/// built V3+ payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobsBundleV1 {
    pub commitments: Vec<Bytes>,
    pub proofs: Vec<Bytes>,
    pub blobs: Vec<Bytes>,
}

/// The full `engine_getPayloadVN` response envelope, generalized across versions:
/// `blobs_bundle` is only populated from V3 onward and `execution_requests` only
/// from V4 onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPayloadResponse {
    pub execution_payload: ExecutionPayload,
    pub block_value: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blobs_bundle: Option<BlobsBundleV1>,
    #[serde(default)]
    pub should_override_builder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_requests: Option<Vec<Bytes>>,
}

mod alloy_serde_quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        u64::from_str_radix(s, 16).map_err(serde::de::Error::custom)
    }
}
