//! Scenario-level tests driving [`EngineApiDispatcher`] end to end against a
//! backend double that owns no EVM, no state database, and no persistence.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use alloy_primitives::{Address, Bloom, Bytes, B256, U256};
use engine_api::{ClientVersion, EngineApiDispatcher, EngineBackend, EngineRequest, RequestId};
use engine_builder_auction::{BlsVerifier, BuilderRegistry, SlotAuction, MIN_BUILDER_STAKE};
use engine_payload_builder::BuiltPayload;
use engine_primitives::{
    payload_id, EngineApiError, ExecutionPayload, ExecutionPayloadBid, ExecutionPayloadV1,
    ExecutionPayloadV2, ExecutionPayloadV3, ExecutionPayloadV4, ExecutionPayloadV5,
    ForkchoiceState, ForkchoiceUpdatedResult, GetPayloadResponse, PayloadAttributes,
    PayloadAttributesV1, PayloadAttributesV2, PayloadAttributesV3, PayloadId, PayloadStatus,
    PayloadStatusEnum,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

struct AlwaysValid;

impl BlsVerifier for AlwaysValid {
    fn verify(&self, _pubkey: &[u8], _message: &[u8], _signature: &[u8]) -> bool {
        true
    }
}

/// Just enough bookkeeping to drive the dispatcher through a full
/// request/response cycle and observe whether it touched the backend.
struct FakeBackend {
    head_timestamp: AtomicU64,
    payloads: Mutex<HashMap<PayloadId, BuiltPayload>>,
    process_block_calls: AtomicUsize,
    forkchoice_calls: AtomicUsize,
    prague_active: AtomicBool,
    get_payload_v4_calls: AtomicUsize,
}

impl FakeBackend {
    fn new(head_timestamp: u64) -> Self {
        Self {
            head_timestamp: AtomicU64::new(head_timestamp),
            payloads: Mutex::new(HashMap::new()),
            process_block_calls: AtomicUsize::new(0),
            forkchoice_calls: AtomicUsize::new(0),
            prague_active: AtomicBool::new(true),
            get_payload_v4_calls: AtomicUsize::new(0),
        }
    }

    fn insert_payload(&self, id: PayloadId, built: BuiltPayload) {
        self.payloads.lock().insert(id, built);
    }

    fn set_prague_active(&self, active: bool) {
        self.prague_active.store(active, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EngineBackend for FakeBackend {
    async fn process_block(
        &self,
        _payload: ExecutionPayloadV3,
        _expected_blob_hashes: Vec<B256>,
        _parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError> {
        self.process_block_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PayloadStatus::valid(B256::repeat_byte(0xAA)))
    }

    async fn process_block_v4(
        &self,
        _payload: ExecutionPayloadV4,
        _expected_blob_hashes: Vec<B256>,
        _parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError> {
        self.process_block_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PayloadStatus::valid(B256::repeat_byte(0xAA)))
    }

    async fn process_block_v5(
        &self,
        _payload: ExecutionPayloadV5,
        _expected_blob_hashes: Vec<B256>,
        _parent_beacon_block_root: B256,
    ) -> Result<PayloadStatus, EngineApiError> {
        self.process_block_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PayloadStatus::valid(B256::repeat_byte(0xAA)))
    }

    async fn forkchoice_updated(
        &self,
        _state: ForkchoiceState,
        attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdatedResult, EngineApiError> {
        self.forkchoice_calls.fetch_add(1, Ordering::SeqCst);
        let id = attributes.map(|attrs| payload_id(&B256::repeat_byte(1), &attrs));
        Ok(ForkchoiceUpdatedResult { payload_status: PayloadStatus::valid(B256::ZERO), payload_id: id })
    }

    async fn forkchoice_updated_v4(
        &self,
        state: ForkchoiceState,
        attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdatedResult, EngineApiError> {
        self.forkchoice_updated(state, attributes).await
    }

    async fn get_payload_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError> {
        self.payloads.lock().get(&id).cloned().ok_or(EngineApiError::UnknownPayload)
    }

    async fn get_payload_v4_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError> {
        self.get_payload_v4_calls.fetch_add(1, Ordering::SeqCst);
        self.get_payload_by_id(id).await
    }

    async fn get_payload_v6_by_id(&self, id: PayloadId) -> Result<BuiltPayload, EngineApiError> {
        self.get_payload_by_id(id).await
    }

    fn is_cancun(&self, _timestamp: u64) -> bool {
        true
    }

    fn is_prague(&self, _timestamp: u64) -> bool {
        self.prague_active.load(Ordering::SeqCst)
    }

    fn is_amsterdam(&self, _timestamp: u64) -> bool {
        true
    }

    fn head_timestamp(&self) -> u64 {
        self.head_timestamp.load(Ordering::SeqCst)
    }

    fn client_version(&self) -> ClientVersion {
        ClientVersion {
            code: "EE".into(),
            name: "fake-engine".into(),
            version: "0.0.0".into(),
            commit: "deadbeef".into(),
        }
    }
}

fn make_dispatcher(
    backend: Arc<FakeBackend>,
) -> (EngineApiDispatcher<FakeBackend>, Arc<BuilderRegistry>) {
    let registry = Arc::new(BuilderRegistry::new());
    let auction = Arc::new(SlotAuction::new(registry.clone()));
    let dispatcher = EngineApiDispatcher::new(backend, registry.clone(), auction, Arc::new(AlwaysValid));
    (dispatcher, registry)
}

fn request(method: &str, params: Vec<Value>) -> EngineRequest {
    EngineRequest::new(method, params, RequestId::Number(1))
}

fn sample_payload_v1() -> ExecutionPayload {
    ExecutionPayload::V1(ExecutionPayloadV1 {
        parent_hash: B256::repeat_byte(1),
        fee_recipient: Address::ZERO,
        state_root: B256::ZERO,
        receipts_root: B256::ZERO,
        logs_bloom: Bloom::ZERO,
        prev_randao: B256::ZERO,
        block_number: 1,
        gas_limit: 30_000_000,
        gas_used: 0,
        timestamp: 200,
        extra_data: Bytes::new(),
        base_fee_per_gas: U256::from(7),
        block_hash: B256::repeat_byte(2),
        transactions: vec![],
    })
}

fn sample_payload_v3() -> ExecutionPayloadV3 {
    ExecutionPayloadV3 {
        payload_inner: ExecutionPayloadV2 {
            payload_inner: ExecutionPayloadV1 {
                parent_hash: B256::repeat_byte(1),
                fee_recipient: Address::ZERO,
                state_root: B256::ZERO,
                receipts_root: B256::ZERO,
                logs_bloom: Bloom::ZERO,
                prev_randao: B256::ZERO,
                block_number: 1,
                gas_limit: 30_000_000,
                gas_used: 0,
                timestamp: 200,
                extra_data: Bytes::new(),
                base_fee_per_gas: U256::from(7),
                block_hash: B256::repeat_byte(2),
                transactions: vec![],
            },
            withdrawals: vec![],
        },
        blob_gas_used: 0,
        excess_blob_gas: 0,
    }
}

fn payload_attributes_v3(timestamp: u64) -> PayloadAttributesV3 {
    PayloadAttributesV3 {
        inner: PayloadAttributesV2 {
            inner: PayloadAttributesV1 {
                timestamp,
                prev_randao: B256::ZERO,
                suggested_fee_recipient: Address::ZERO,
            },
            withdrawals: vec![],
        },
        parent_beacon_block_root: B256::repeat_byte(7),
    }
}

fn forkchoice_state() -> ForkchoiceState {
    ForkchoiceState {
        head_block_hash: B256::repeat_byte(1),
        safe_block_hash: B256::repeat_byte(1),
        finalized_block_hash: B256::repeat_byte(1),
    }
}

fn registration_params(pubkey_byte: u8, registration_time: u64) -> Value {
    json!({
        "blsPubkey": Bytes::from(vec![pubkey_byte; 48]),
        "feeRecipient": Address::ZERO,
        "gasLimit": 30_000_000u64,
        "stake": U256::from(MIN_BUILDER_STAKE),
        "registrationTime": registration_time,
        "signingRoot": Bytes::from(vec![0xAB_u8; 32]),
        "signature": Bytes::from(vec![0xCD_u8; 96]),
    })
}

fn bid_params(pubkey_byte: u8, slot: u64, value: u64, block_hash: B256) -> Value {
    json!({
        "builderPubkey": Bytes::from(vec![pubkey_byte; 48]),
        "bid": ExecutionPayloadBid {
            parent_block_hash: B256::repeat_byte(1),
            parent_block_root: B256::ZERO,
            block_hash,
            prev_randao: B256::ZERO,
            fee_recipient: Address::ZERO,
            gas_limit: 30_000_000,
            builder_index: 0,
            slot,
            value: U256::from(value),
            execution_payment: U256::ZERO,
            blob_kzg_commitments: vec![],
        },
        "signingRoot": Bytes::from(vec![0xAB_u8; 32]),
        "signature": Bytes::from(vec![0xCD_u8; 96]),
    })
}

async fn register_builder(dispatcher: &EngineApiDispatcher<FakeBackend>, pubkey_byte: u8) {
    let response = dispatcher
        .dispatch(request("engine_registerBuilderV1", vec![registration_params(pubkey_byte, 0)]))
        .await;
    assert!(response.error.is_none(), "registration should succeed: {:?}", response.error);
}

async fn submit_bid(
    dispatcher: &EngineApiDispatcher<FakeBackend>,
    pubkey_byte: u8,
    slot: u64,
    value: u64,
    block_hash: B256,
) {
    let response = dispatcher
        .dispatch(request("engine_submitBuilderBidV1", vec![bid_params(pubkey_byte, slot, value, block_hash)]))
        .await;
    assert!(response.error.is_none(), "bid submission should succeed: {:?}", response.error);
}

// (a) forkchoiceUpdated starts a build job, getPayload serves it back.
#[tokio::test]
async fn forkchoice_then_get_payload_round_trips() {
    let backend = Arc::new(FakeBackend::new(100));
    let (dispatcher, _registry) = make_dispatcher(backend.clone());

    let attrs = PayloadAttributes::V3(payload_attributes_v3(200));
    let response = dispatcher
        .dispatch(request("engine_forkchoiceUpdatedV3", vec![json!(forkchoice_state()), json!(attrs)]))
        .await;
    assert!(response.error.is_none(), "forkchoiceUpdated should succeed: {:?}", response.error);
    let result: ForkchoiceUpdatedResult = serde_json::from_value(response.result.unwrap()).unwrap();
    let id = result.payload_id.expect("attributes were supplied, a build job should be started");

    backend.insert_payload(id, BuiltPayload::new(id, sample_payload_v1(), U256::from(42)));

    let get_response = dispatcher.dispatch(request("engine_getPayloadV3", vec![json!(id)])).await;
    assert!(get_response.error.is_none(), "getPayload should succeed: {:?}", get_response.error);
    let served: GetPayloadResponse = serde_json::from_value(get_response.result.unwrap()).unwrap();
    assert_eq!(served.block_value, U256::from(42));
}

// (b) a timestamp that does not advance past the chain head is rejected with
// InvalidPayloadAttributes, and the backend is never invoked for it.
#[tokio::test]
async fn stale_timestamp_attributes_are_rejected_before_backend_is_called() {
    let backend = Arc::new(FakeBackend::new(500));
    let (dispatcher, _registry) = make_dispatcher(backend.clone());

    let attrs = PayloadAttributes::V3(payload_attributes_v3(400));
    let response = dispatcher
        .dispatch(request("engine_forkchoiceUpdatedV3", vec![json!(forkchoice_state()), json!(attrs)]))
        .await;

    let error = response.error.expect("a stale timestamp must be rejected");
    assert_eq!(error.code(), -38003);
    assert_eq!(backend.forkchoice_calls.load(Ordering::SeqCst), 0);
}

// (c) a structurally invalid payload is reported as a successful response
// carrying PayloadStatus::INVALID, never as an RPC error, and the backend is
// never asked to execute it.
#[tokio::test]
async fn structurally_invalid_payload_yields_invalid_status_not_an_rpc_error() {
    let backend = Arc::new(FakeBackend::new(0));
    let (dispatcher, _registry) = make_dispatcher(backend.clone());

    let mut payload = sample_payload_v3();
    payload.payload_inner.payload_inner.extra_data = Bytes::from(vec![0u8; 33]);

    let response = dispatcher
        .dispatch(request(
            "engine_newPayloadV3",
            vec![json!(payload), json!(Vec::<B256>::new()), json!(B256::repeat_byte(9))],
        ))
        .await;

    assert!(response.error.is_none(), "a structural defect is a successful response, not an RPC error");
    let status: PayloadStatus = serde_json::from_value(response.result.unwrap()).unwrap();
    assert_eq!(status.status, PayloadStatusEnum::Invalid);
    assert_eq!(backend.process_block_calls.load(Ordering::SeqCst), 0);
}

// (d) three competing bids resolve to a Vickrey (second-price) outcome: the
// 200-value bid wins, and the second-highest bid of 100 clears the auction.
#[tokio::test]
async fn vickrey_auction_selects_the_highest_bid_at_the_second_price() {
    let backend = Arc::new(FakeBackend::new(0));
    let (dispatcher, _registry) = make_dispatcher(backend);

    register_builder(&dispatcher, 1).await;
    register_builder(&dispatcher, 2).await;
    register_builder(&dispatcher, 3).await;
    submit_bid(&dispatcher, 1, 7, 50, B256::repeat_byte(10)).await;
    submit_bid(&dispatcher, 2, 7, 200, B256::repeat_byte(11)).await;
    submit_bid(&dispatcher, 3, 7, 100, B256::repeat_byte(12)).await;

    let header_response =
        dispatcher.dispatch(request("engine_getPayloadHeaderV1", vec![json!(7u64)])).await;
    assert!(header_response.error.is_none());
    let winner: ExecutionPayloadBid = serde_json::from_value(header_response.result.unwrap()).unwrap();
    assert_eq!(winner.value, U256::from(200));
    assert_eq!(winner.block_hash, B256::repeat_byte(11));

    let bids_response =
        dispatcher.dispatch(request("engine_getBuilderBidsV1", vec![json!(7u64)])).await;
    let bids: Vec<ExecutionPayloadBid> = serde_json::from_value(bids_response.result.unwrap()).unwrap();
    assert_eq!(bids.iter().map(|b| b.value).collect::<Vec<_>>(), vec![
        U256::from(200),
        U256::from(100),
        U256::from(50)
    ]);
    assert_eq!(bids[1].value, U256::from(100), "the second-price bid clears the auction at 100");
}

// (e) a blinded block whose revealed gas limit disagrees with the bid that won
// its slot is rejected, surfaced as InvalidParams rather than silently accepted.
#[tokio::test]
async fn blinded_block_with_mismatched_gas_limit_is_rejected() {
    let backend = Arc::new(FakeBackend::new(0));
    let (dispatcher, _registry) = make_dispatcher(backend);

    register_builder(&dispatcher, 9).await;
    submit_bid(&dispatcher, 9, 3, 77, B256::repeat_byte(20)).await;

    let mut payload = sample_payload_v3();
    payload.payload_inner.payload_inner.block_hash = B256::repeat_byte(20);
    payload.payload_inner.payload_inner.parent_hash = B256::repeat_byte(1);
    payload.payload_inner.payload_inner.gas_limit = 29_000_000;

    let response = dispatcher
        .dispatch(request("engine_submitBlindedBlockV1", vec![json!(3u64), json!(payload)]))
        .await;

    let error = response.error.expect("a gas-limit mismatch on reveal must be rejected");
    assert_eq!(error.code(), -32602);
}

// (f) the EIP-1559 base-fee recurrence, exercised independently of the
// dispatcher since parent-relative validation is the embedder's own job.
#[test]
fn base_fee_recurrence_matches_eip1559_when_usage_is_above_target() {
    let parent = engine_payload_validator::ParentContext {
        timestamp: 100,
        gas_limit: 30_000_000,
        gas_used: 30_000_000,
        base_fee_per_gas: U256::from(1_000_000_000u64),
    };
    let next = engine_payload_validator::calc_base_fee(&parent);
    assert_eq!(next, U256::from(1_125_000_000u64));
}

// (g) a payload declaring more blob versioned hashes than the configured
// schedule allows is reported as a successful response carrying
// PayloadStatus::INVALID, never an RPC error, and the backend is never asked
// to execute it.
#[tokio::test]
async fn excess_blob_hash_count_yields_invalid_status_not_an_rpc_error() {
    let backend = Arc::new(FakeBackend::new(0));
    let (dispatcher, _registry) = make_dispatcher(backend.clone());

    let payload = sample_payload_v3();
    let too_many_hashes: Vec<B256> = (0..7u8).map(B256::repeat_byte).collect();

    let response = dispatcher
        .dispatch(request(
            "engine_newPayloadV3",
            vec![json!(payload), json!(too_many_hashes), json!(B256::repeat_byte(9))],
        ))
        .await;

    assert!(response.error.is_none(), "an oversized blob count is a successful response, not an RPC error");
    let status: PayloadStatus = serde_json::from_value(response.result.unwrap()).unwrap();
    assert_eq!(status.status, PayloadStatusEnum::Invalid);
    assert_eq!(backend.process_block_calls.load(Ordering::SeqCst), 0);
}

// (h) a payload that fails getPayloadV4's fork gate is never cached: a second
// call still reaches the backend and still fails, rather than being served a
// stale cached response that bypassed the gate on its first insertion.
#[tokio::test]
async fn fork_gate_failure_on_get_payload_v4_is_never_cached() {
    let backend = Arc::new(FakeBackend::new(0));
    backend.set_prague_active(false);
    let (dispatcher, _registry) = make_dispatcher(backend.clone());

    let id = PayloadId::new([1, 2, 3, 4, 5, 6, 7, 8]);
    backend.insert_payload(id, BuiltPayload::new(id, sample_payload_v1(), U256::ZERO));

    let first = dispatcher.dispatch(request("engine_getPayloadV4", vec![json!(id)])).await;
    assert_eq!(first.error.expect("fork gate must reject").code(), -38005);

    let second = dispatcher.dispatch(request("engine_getPayloadV4", vec![json!(id)])).await;
    assert_eq!(second.error.expect("fork gate must reject again, not serve a cached hit").code(), -38005);

    assert_eq!(
        backend.get_payload_v4_calls.load(Ordering::SeqCst),
        2,
        "a gate failure must not be cached; the second call must reach the backend again"
    );
}
