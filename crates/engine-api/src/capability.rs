use alloy_primitives::B256;
use async_trait::async_trait;
use engine_payload_builder::BuiltPayload;
use engine_primitives::{
    EngineApiError, ExecutionPayloadV3, ExecutionPayloadV4, ExecutionPayloadV5, ForkchoiceState,
    ForkchoiceUpdatedResult, PayloadAttributes, PayloadId, PayloadStatus,
};

/// Everything the dispatcher needs from the execution backend. An embedder
/// implements this once against its own block processing, state transition,
/// and payload-building machinery; the dispatcher itself never touches the EVM,
/// the state database, or transaction decoding directly.
#[async_trait]
pub trait EngineBackend: Send + Sync + 'static {
    /// Validates and executes a Cancun-era payload against `expected_blob_hashes`.
    async fn process_block(
        &self,
        payload: ExecutionPayloadV3,
        expected_blob_hashes: Vec<B256>,
        parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError>;

    /// Validates and executes a Prague-era payload carrying execution requests.
    async fn process_block_v4(
        &self,
        payload: ExecutionPayloadV4,
        expected_blob_hashes: Vec<B256>,
        parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError>;

    /// Validates and executes an Amsterdam-era payload carrying a block access list.
    async fn process_block_v5(
        &self,
        payload: ExecutionPayloadV5,
        expected_blob_hashes: Vec<B256>,
        parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError>;

    /// Updates head/safe/finalized; starts a build if `attributes` is present.
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdatedResult, EngineApiError>;

    /// Same as [`Self::forkchoice_updated`] for the Prague+ attribute shape
    /// (carries `slot`).
    async fn forkchoice_updated_v4(
        &self,
        state: ForkchoiceState,
        attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdatedResult, EngineApiError>;

    async fn get_payload_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError>;
    async fn get_payload_v4_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError>;
    async fn get_payload_v6_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError>;

    /// Fork-activation predicates, keyed on block timestamp.
    fn is_cancun(&self, timestamp: u64) -> bool;
    fn is_prague(&self, timestamp: u64) -> bool;
    fn is_amsterdam(&self, timestamp: u64) -> bool;

    /// Timestamp of the current chain head, used to gate attributes-driven builds.
    fn head_timestamp(&self) -> u64;

    /// Client identity returned by `getClientVersionV1`.
    fn client_version(&self) -> ClientVersion;
}

/// Identity advertised by `getClientVersionV1`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientVersion {
    pub code: String,
    pub name: String,
    pub version: String,
    pub commit: String,
}

/// The full set of engine methods this dispatcher supports, advertised by
/// `exchangeCapabilities`.
pub const SUPPORTED_CAPABILITIES: &[&str] = &[
    "engine_newPayloadV3",
    "engine_newPayloadV4",
    "engine_newPayloadV5",
    "engine_forkchoiceUpdatedV3",
    "engine_forkchoiceUpdatedV4",
    "engine_getPayloadV3",
    "engine_getPayloadV4",
    "engine_getPayloadV6",
    "engine_exchangeCapabilities",
    "engine_getClientVersionV1",
    "engine_getBlobsV2",
    "engine_registerBuilderV1",
    "engine_submitBuilderBidV1",
    "engine_getBuilderBidsV1",
    "engine_getPayloadHeaderV1",
    "engine_submitBlindedBlockV1",
    "engine_newInclusionListV1",
    "engine_getInclusionListV1",
];

/// `exchangeCapabilities`: intersects the caller-advertised method list with
/// what this dispatcher supports, and returns this dispatcher's own list
/// (the method takes no meaningful input beyond logging the peer's set).
pub fn exchange_capabilities(_peer_methods: &[String]) -> Vec<String> {
    SUPPORTED_CAPABILITIES.iter().map(|s| s.to_string()).collect()
}
