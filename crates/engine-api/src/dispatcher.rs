//! The engine method table: arity checks, parameter decoding, fork gating, and
//! the single funnel through which every failure becomes either an RPC error
//! (via [`crate::error::to_error_object`]) or a successful response carrying a
//! negative [`PayloadStatus`] — never both.

use std::{collections::BTreeMap, sync::Arc};

use alloy_primitives::{Bytes, B256, U256};
use engine_blob::BlobScheduleConfig;
use engine_builder_auction::{
    register_signed, submit_bid_signed, validate_bid_payload, AuctionResult, BidError,
    BlsVerifier, BuilderRegistry, RegistrationMessage, RegistryError, RevealError, SignedBid,
    SignedRegistrationMessage, SlotAuction,
};
use engine_payload_validator::check_intrinsic;
use engine_primitives::{
    EngineApiError, ExecutionPayloadBid, ExecutionPayloadV1, ExecutionPayloadV3,
    ExecutionPayloadV4, ExecutionPayloadV5, ForkchoiceState, PayloadAttributes, PayloadId,
    PayloadStatus,
};
use engine_requests::parse_requests;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::{
    cache::PayloadCache,
    capability::{self, ClientVersion, EngineBackend, SUPPORTED_CAPABILITIES},
    envelope::{EngineRequest, EngineResponse},
    error::to_error_object,
    metrics::DispatcherMetrics,
};

/// Everything the dispatcher owns beyond the backend capability set: the
/// payload response cache, the builder registry/auction pair, and the opaque
/// BLS verifier used to gate registration and bid submission. None of this is
/// persisted across restarts (spec: no persisted state).
pub struct EngineApiDispatcher<B: EngineBackend> {
    backend: Arc<B>,
    cache: PayloadCache,
    registry: Arc<BuilderRegistry>,
    auction: Arc<SlotAuction>,
    verifier: Arc<dyn BlsVerifier>,
    blob_config: BlobScheduleConfig,
    inclusion_lists: Mutex<BTreeMap<u64, Vec<Bytes>>>,
    metrics: DispatcherMetrics,
}

impl<B: EngineBackend> EngineApiDispatcher<B> {
    pub fn new(
        backend: Arc<B>,
        registry: Arc<BuilderRegistry>,
        auction: Arc<SlotAuction>,
        verifier: Arc<dyn BlsVerifier>,
    ) -> Self {
        Self {
            backend,
            cache: PayloadCache::new(),
            registry,
            auction,
            verifier,
            blob_config: BlobScheduleConfig::default(),
            inclusion_lists: Mutex::new(BTreeMap::new()),
            metrics: DispatcherMetrics::default(),
        }
    }

    /// Decodes, gates, and executes `request`, returning a response that is
    /// always well-formed: either a successful result or an RPC error object,
    /// never a raw panic or partial mutation.
    pub async fn dispatch(&self, request: EngineRequest) -> EngineResponse {
        self.metrics.requests_total.increment(1);
        let id = request.id.clone();
        match self.dispatch_method(&request.method, &request.params).await {
            Ok(result) => EngineResponse::success(id, result),
            Err(err) => {
                self.metrics.errors_total.increment(1);
                debug!(target: "engine_api", method = %request.method, %err, "request failed");
                EngineResponse::failure(id, to_error_object(err))
            }
        }
    }

    async fn dispatch_method(
        &self,
        method: &str,
        params: &[Value],
    ) -> Result<Value, EngineApiError> {
        match method {
            "engine_newPayloadV3" => self.new_payload_v3(params).await,
            "engine_newPayloadV4" => self.new_payload_v4(params).await,
            "engine_newPayloadV5" => self.new_payload_v5(params).await,
            "engine_forkchoiceUpdatedV3" => self.forkchoice_updated_v3(params).await,
            "engine_forkchoiceUpdatedV4" => self.forkchoice_updated_v4(params).await,
            "engine_getPayloadV3" => self.get_payload_v3(params).await,
            "engine_getPayloadV4" => self.get_payload_v4(params).await,
            "engine_getPayloadV6" => self.get_payload_v6(params).await,
            "engine_exchangeCapabilities" => self.exchange_capabilities(params),
            "engine_getClientVersionV1" => self.get_client_version_v1(params),
            "engine_getBlobsV2" => self.get_blobs_v2(params),
            "engine_registerBuilderV1" => self.register_builder_v1(params),
            "engine_submitBuilderBidV1" => self.submit_builder_bid_v1(params),
            "engine_getBuilderBidsV1" => self.get_builder_bids_v1(params),
            "engine_getPayloadHeaderV1" => self.get_payload_header_v1(params),
            "engine_submitBlindedBlockV1" => self.submit_blinded_block_v1(params),
            "engine_newInclusionListV1" => self.new_inclusion_list_v1(params),
            "engine_getInclusionListV1" => self.get_inclusion_list_v1(params),
            other => Err(EngineApiError::MethodNotFound(other.to_string())),
        }
    }

    // ---- newPayload ----------------------------------------------------

    async fn new_payload_v3(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 3, 3, "engine_newPayloadV3")?;
        let payload: ExecutionPayloadV3 = decode(params, 0, "engine_newPayloadV3")?;
        let versioned_hashes: Vec<B256> = decode(params, 1, "engine_newPayloadV3")?;
        let parent_beacon_block_root: B256 = decode(params, 2, "engine_newPayloadV3")?;

        if !self.backend.is_cancun(payload.payload_inner.payload_inner.timestamp) {
            return Err(EngineApiError::UnsupportedFork(
                "newPayloadV3 requires Cancun to be active at the payload's timestamp".into(),
            ));
        }
        if parent_beacon_block_root.is_zero() {
            return Err(EngineApiError::InvalidParams(
                "parentBeaconBlockRoot must be non-zero for newPayloadV3".into(),
            ));
        }
        if let Some(invalid) = self.check_blob_hash_count(&versioned_hashes) {
            return Ok(invalid);
        }
        if let Err(e) = check_intrinsic(&payload.payload_inner.payload_inner) {
            return Ok(json!(PayloadStatus::invalid(e.to_string())));
        }

        let status = self
            .backend
            .process_block(payload, versioned_hashes, parent_beacon_block_root)
            .await?;
        Ok(json!(status))
    }

    async fn new_payload_v4(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 4, 4, "engine_newPayloadV4")?;
        let payload_v3: ExecutionPayloadV3 = decode(params, 0, "engine_newPayloadV4")?;
        let versioned_hashes: Vec<B256> = decode(params, 1, "engine_newPayloadV4")?;
        let parent_beacon_block_root: B256 = decode(params, 2, "engine_newPayloadV4")?;
        let execution_requests: Vec<Bytes> = decode(params, 3, "engine_newPayloadV4")?;

        if !self.backend.is_prague(payload_v3.payload_inner.payload_inner.timestamp) {
            return Err(EngineApiError::UnsupportedFork(
                "newPayloadV4 requires Prague to be active at the payload's timestamp".into(),
            ));
        }
        if parent_beacon_block_root.is_zero() {
            return Err(EngineApiError::InvalidParams(
                "parentBeaconBlockRoot must be non-zero for newPayloadV4".into(),
            ));
        }
        if let Some(invalid) = self.check_blob_hash_count(&versioned_hashes) {
            return Ok(invalid);
        }
        parse_requests(&execution_requests)
            .map_err(|e| EngineApiError::InvalidParams(format!("execution requests: {e}")))?;
        if let Err(e) = check_intrinsic(&payload_v3.payload_inner.payload_inner) {
            return Ok(json!(PayloadStatus::invalid(e.to_string())));
        }

        let payload = ExecutionPayloadV4 { payload_inner: payload_v3, execution_requests };
        let status = self
            .backend
            .process_block_v4(payload, versioned_hashes, parent_beacon_block_root)
            .await?;
        Ok(json!(status))
    }

    async fn new_payload_v5(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 4, 4, "engine_newPayloadV5")?;
        let payload_core: PayloadV3WithAccessList = decode(params, 0, "engine_newPayloadV5")?;
        let versioned_hashes: Vec<B256> = decode(params, 1, "engine_newPayloadV5")?;
        let parent_beacon_block_root: B256 = decode(params, 2, "engine_newPayloadV5")?;
        let execution_requests: Vec<Bytes> = decode(params, 3, "engine_newPayloadV5")?;

        if !self.backend.is_amsterdam(payload_core.inner.payload_inner.payload_inner.timestamp) {
            return Err(EngineApiError::UnsupportedFork(
                "newPayloadV5 requires Amsterdam to be active at the payload's timestamp".into(),
            ));
        }
        if parent_beacon_block_root.is_zero() {
            return Err(EngineApiError::InvalidParams(
                "parentBeaconBlockRoot must be non-zero for newPayloadV5".into(),
            ));
        }
        if payload_core.block_access_list.is_empty() {
            return Err(EngineApiError::InvalidParams(
                "blockAccessList must be present for newPayloadV5".into(),
            ));
        }
        if let Some(invalid) = self.check_blob_hash_count(&versioned_hashes) {
            return Ok(invalid);
        }
        parse_requests(&execution_requests)
            .map_err(|e| EngineApiError::InvalidParams(format!("execution requests: {e}")))?;
        if let Err(e) = check_intrinsic(&payload_core.inner.payload_inner.payload_inner) {
            return Ok(json!(PayloadStatus::invalid(e.to_string())));
        }

        let payload = ExecutionPayloadV5 {
            payload_inner: ExecutionPayloadV4 {
                payload_inner: payload_core.inner,
                execution_requests,
            },
            block_access_list: payload_core.block_access_list,
        };
        let status = self
            .backend
            .process_block_v5(payload, versioned_hashes, parent_beacon_block_root)
            .await?;
        Ok(json!(status))
    }

    // ---- forkchoiceUpdated ----------------------------------------------

    async fn forkchoice_updated_v3(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 2, "engine_forkchoiceUpdatedV3")?;
        let state: ForkchoiceState = decode(params, 0, "engine_forkchoiceUpdatedV3")?;
        let attributes: Option<PayloadAttributes> = optional(params, 1, "engine_forkchoiceUpdatedV3")?;

        if let Some(attrs) = &attributes {
            self.validate_attributes_for_build(attrs, false)?;
        }

        let result = self.backend.forkchoice_updated(state, attributes).await?;
        Ok(json!(result))
    }

    async fn forkchoice_updated_v4(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 2, "engine_forkchoiceUpdatedV4")?;
        let state: ForkchoiceState = decode(params, 0, "engine_forkchoiceUpdatedV4")?;
        let attributes: Option<PayloadAttributes> = optional(params, 1, "engine_forkchoiceUpdatedV4")?;

        if let Some(attrs) = &attributes {
            self.validate_attributes_for_build(attrs, true)?;
        }

        let result = self.backend.forkchoice_updated_v4(state, attributes).await?;
        Ok(json!(result))
    }

    /// Attributes-driven build validation (spec §4.6 item 5), run to
    /// completion *before* the backend is invoked: an invalid-attributes
    /// rejection must never leave the backend having started a build. When
    /// `require_slot` is set (the V4 call), the attributes must also carry a
    /// slot number, i.e. be the V4 variant.
    fn validate_attributes_for_build(
        &self,
        attrs: &PayloadAttributes,
        require_slot: bool,
    ) -> Result<(), EngineApiError> {
        if require_slot && attrs.slot().is_none() {
            return Err(EngineApiError::InvalidPayloadAttributes(
                "forkchoiceUpdatedV4 requires attributes carrying a slot number".into(),
            ));
        }

        let root = attrs.parent_beacon_block_root().ok_or_else(|| {
            EngineApiError::InvalidPayloadAttributes(
                "parentBeaconBlockRoot is mandatory on attributes from V3 onward".into(),
            )
        })?;
        if root.is_zero() {
            return Err(EngineApiError::InvalidPayloadAttributes(
                "parentBeaconBlockRoot must be non-zero".into(),
            ));
        }
        if attrs.timestamp() == 0 {
            return Err(EngineApiError::InvalidPayloadAttributes("timestamp must be non-zero".into()));
        }
        let head_timestamp = self.backend.head_timestamp();
        if attrs.timestamp() <= head_timestamp {
            return Err(EngineApiError::InvalidPayloadAttributes(format!(
                "timestamp {} is not greater than head timestamp {head_timestamp}",
                attrs.timestamp()
            )));
        }
        Ok(())
    }

    // ---- getPayload ------------------------------------------------------

    async fn get_payload_v3(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getPayloadV3")?;
        let id: PayloadId = decode(params, 0, "engine_getPayloadV3")?;
        let response = self.resolve_cached(id, |backend, id| backend.get_payload_by_id(id)).await?;
        Ok(json!(response))
    }

    async fn get_payload_v4(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getPayloadV4")?;
        let id: PayloadId = decode(params, 0, "engine_getPayloadV4")?;
        let response = self
            .resolve_cached_gated(
                id,
                "engine_getPayloadV4",
                |backend, id| backend.get_payload_v4_by_id(id),
                |b, ts| b.is_prague(ts),
            )
            .await?;
        Ok(json!(response))
    }

    async fn get_payload_v6(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getPayloadV6")?;
        let id: PayloadId = decode(params, 0, "engine_getPayloadV6")?;
        let response = self
            .resolve_cached_gated(
                id,
                "engine_getPayloadV6",
                |backend, id| backend.get_payload_v6_by_id(id),
                |b, ts| b.is_amsterdam(ts),
            )
            .await?;
        Ok(json!(response))
    }

    /// Serves `id` from the response cache if present, otherwise resolves the
    /// build job through `fetch` and caches the result. A cache hit and a
    /// cache miss are indistinguishable to the caller.
    async fn resolve_cached<F, Fut>(
        &self,
        id: PayloadId,
        fetch: F,
    ) -> Result<engine_primitives::GetPayloadResponse, EngineApiError>
    where
        F: FnOnce(&B, PayloadId) -> Fut,
        Fut: std::future::Future<
            Output = Result<engine_payload_builder::BuiltPayload, EngineApiError>,
        >,
    {
        if let Some(cached) = self.cache.get(&id) {
            self.metrics.payload_cache_hits.increment(1);
            trace!(target: "engine_api", %id, "getPayload served from cache");
            return Ok(cached);
        }

        let built = fetch(self.backend.as_ref(), id).await?;
        let response = built.into_response();
        self.cache.insert(id, response.clone());
        Ok(response)
    }

    /// Same as [`Self::resolve_cached`], but for the fork-gated `getPayload*`
    /// variants (V4/V6): the gate runs on a freshly-fetched response *before*
    /// it is cached, so a payload that fails its fork gate is never inserted.
    /// A cache hit already passed the gate at insertion time and is served
    /// without re-checking it.
    async fn resolve_cached_gated<F, Fut>(
        &self,
        id: PayloadId,
        method: &str,
        fetch: F,
        predicate: impl Fn(&B, u64) -> bool,
    ) -> Result<engine_primitives::GetPayloadResponse, EngineApiError>
    where
        F: FnOnce(&B, PayloadId) -> Fut,
        Fut: std::future::Future<
            Output = Result<engine_payload_builder::BuiltPayload, EngineApiError>,
        >,
    {
        if let Some(cached) = self.cache.get(&id) {
            self.metrics.payload_cache_hits.increment(1);
            trace!(target: "engine_api", %id, "getPayload served from cache");
            return Ok(cached);
        }

        let built = fetch(self.backend.as_ref(), id).await?;
        let response = built.into_response();
        self.check_fork_gate(&response, method, predicate)?;
        self.cache.insert(id, response.clone());
        Ok(response)
    }

    fn check_fork_gate(
        &self,
        response: &engine_primitives::GetPayloadResponse,
        method: &str,
        predicate: impl Fn(&B, u64) -> bool,
    ) -> Result<(), EngineApiError> {
        let timestamp = response.execution_payload.as_v1().timestamp;
        if !predicate(self.backend.as_ref(), timestamp) {
            return Err(EngineApiError::UnsupportedFork(format!(
                "{method} requires its payload's fork to be active at timestamp {timestamp}"
            )));
        }
        Ok(())
    }

    /// Structural blob-count check (spec §3's sidecar invariant `N ≤
    /// maxBlobsPerBlock`, as applied to the CL-supplied versioned-hash list):
    /// returns a populated `Some(PayloadStatus::invalid(..))` response value
    /// when the declared hash count exceeds the configured schedule, `None`
    /// otherwise. Uses the dispatcher's own `blob_config` rather than
    /// delegating to the backend, since this is a shape check on the
    /// dispatcher's input, not an execution concern.
    fn check_blob_hash_count(&self, versioned_hashes: &[B256]) -> Option<Value> {
        let max = self.blob_config.max_blobs_per_block;
        if versioned_hashes.len() as u64 > max {
            return Some(json!(PayloadStatus::invalid(format!(
                "payload declares {} blob versioned hashes, exceeding the configured max of {max} per block",
                versioned_hashes.len()
            ))));
        }
        None
    }

    // ---- capability / identity -------------------------------------------

    fn exchange_capabilities(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_exchangeCapabilities")?;
        let peer_methods: Vec<String> = decode(params, 0, "engine_exchangeCapabilities")?;
        Ok(json!(capability::exchange_capabilities(&peer_methods)))
    }

    fn get_client_version_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 0, 1, "engine_getClientVersionV1")?;
        let versions: Vec<ClientVersion> = vec![self.backend.client_version()];
        Ok(json!(versions))
    }

    fn get_blobs_v2(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getBlobsV2")?;
        let hashes: Vec<B256> = decode(params, 0, "engine_getBlobsV2")?;
        const MAX_REQUESTED_HASHES: usize = 128;
        if hashes.len() > MAX_REQUESTED_HASHES {
            return Err(EngineApiError::TooLargeRequest(format!(
                "requested {} hashes, exceeding the cap of {MAX_REQUESTED_HASHES}",
                hashes.len()
            )));
        }
        // No blob store is carried across the core (spec §6: no persisted
        // state); absent a backing store every hash is reported missing.
        Ok(Value::Null)
    }

    // ---- builder registry / auction (ePBS) --------------------------------

    fn register_builder_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_registerBuilderV1")?;
        let wire: SignedRegistrationWire = decode(params, 0, "engine_registerBuilderV1")?;
        let signed = SignedRegistrationMessage {
            message: RegistrationMessage {
                bls_pubkey: wire.bls_pubkey,
                fee_recipient: wire.fee_recipient,
                gas_limit: wire.gas_limit,
            },
            signing_root: wire.signing_root,
            signature: wire.signature,
        };
        let builder = register_signed(
            &self.registry,
            signed,
            wire.stake,
            wire.registration_time,
            self.verifier.as_ref(),
        )
        .map_err(map_registry_error)?;
        Ok(json!(builder))
    }

    fn submit_builder_bid_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_submitBuilderBidV1")?;
        let wire: SignedBidWire = decode(params, 0, "engine_submitBuilderBidV1")?;
        let signed =
            SignedBid { bid: wire.bid, signing_root: wire.signing_root, signature: wire.signature };
        submit_bid_signed(&self.auction, &wire.builder_pubkey, signed, self.verifier.as_ref())
            .map_err(map_bid_error)?;
        Ok(Value::Null)
    }

    fn get_builder_bids_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getBuilderBidsV1")?;
        let slot: u64 = decode(params, 0, "engine_getBuilderBidsV1")?;
        Ok(json!(self.auction.bids_for_slot(slot)))
    }

    fn get_payload_header_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_getPayloadHeaderV1")?;
        let slot: u64 = decode(params, 0, "engine_getPayloadHeaderV1")?;
        let AuctionResult { winner, .. } = self.auction.run_auction(slot).map_err(map_bid_error)?;
        Ok(json!(winner))
    }

    fn submit_blinded_block_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 2, 2, "engine_submitBlindedBlockV1")?;
        let slot: u64 = decode(params, 0, "engine_submitBlindedBlockV1")?;
        let payload: ExecutionPayloadV3 = decode(params, 1, "engine_submitBlindedBlockV1")?;

        let bid: ExecutionPayloadBid = self.auction.best_bid(slot).map_err(map_bid_error)?;
        let revealed: &ExecutionPayloadV1 = &payload.payload_inner.payload_inner;
        validate_bid_payload(&bid, revealed).map_err(map_reveal_error)?;

        Ok(json!({
            "blockValue": bid.value,
            "executionPayload": payload,
        }))
    }

    fn new_inclusion_list_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 1, 1, "engine_newInclusionListV1")?;
        let wire: InclusionListWire = decode(params, 0, "engine_newInclusionListV1")?;
        self.inclusion_lists.lock().insert(wire.slot, wire.transactions);
        Ok(Value::Null)
    }

    fn get_inclusion_list_v1(&self, params: &[Value]) -> Result<Value, EngineApiError> {
        arity(params, 0, 0, "engine_getInclusionListV1")?;
        let lists = self.inclusion_lists.lock();
        let latest = lists.iter().next_back().map(|(_, txs)| txs.clone()).unwrap_or_default();
        Ok(json!(latest))
    }

    /// Resets blob-schedule tunables, e.g. when the embedder activates a later
    /// fork with a different target/max blob count. Not part of the dispatch
    /// surface; exposed for the embedder's fork-activation hook.
    pub fn set_blob_config(&mut self, config: BlobScheduleConfig) {
        self.blob_config = config;
    }

    pub fn supported_capabilities(&self) -> &'static [&'static str] {
        SUPPORTED_CAPABILITIES
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadV3WithAccessList {
    #[serde(flatten)]
    inner: ExecutionPayloadV3,
    block_access_list: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedRegistrationWire {
    bls_pubkey: Bytes,
    fee_recipient: alloy_primitives::Address,
    gas_limit: u64,
    stake: U256,
    registration_time: u64,
    signing_root: Bytes,
    signature: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedBidWire {
    builder_pubkey: Bytes,
    bid: ExecutionPayloadBid,
    signing_root: Bytes,
    signature: Bytes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InclusionListWire {
    slot: u64,
    transactions: Vec<Bytes>,
}

fn arity(params: &[Value], min: usize, max: usize, method: &str) -> Result<(), EngineApiError> {
    if params.len() < min || params.len() > max {
        return Err(EngineApiError::InvalidParams(format!(
            "{method} expects between {min} and {max} params, got {}",
            params.len()
        )));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(params: &[Value], idx: usize, method: &str) -> Result<T, EngineApiError> {
    let value = params
        .get(idx)
        .ok_or_else(|| EngineApiError::InvalidParams(format!("{method}: missing param {idx}")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| EngineApiError::InvalidParams(format!("{method}: param {idx} decode error: {e}")))
}

fn optional<T: DeserializeOwned>(
    params: &[Value],
    idx: usize,
    method: &str,
) -> Result<Option<T>, EngineApiError> {
    match params.get(idx) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| EngineApiError::InvalidParams(format!("{method}: param {idx} decode error: {e}"))),
    }
}

fn map_registry_error(err: RegistryError) -> EngineApiError {
    warn!(target: "engine_api", %err, "builder registry rejected request");
    EngineApiError::InvalidParams(err.to_string())
}

fn map_bid_error(err: BidError) -> EngineApiError {
    match err {
        BidError::NoBidsAvailable(_) => EngineApiError::UnknownPayload,
        other => EngineApiError::InvalidParams(other.to_string()),
    }
}

fn map_reveal_error(err: RevealError) -> EngineApiError {
    EngineApiError::InvalidParams(err.to_string())
}
