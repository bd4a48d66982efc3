use alloy_primitives::{Bytes, B256, U256};
use engine_blob::BlobsBundle;
use engine_primitives::{
    payload_id as derive_payload_id, ExecutionPayload, GetPayloadResponse, PayloadAttributes,
    PayloadId,
};

/// Wraps the consensus layer's `PayloadAttributes` with the parent hash and the
/// `PayloadId` deterministically derived from both, computed once at
/// construction time.
#[derive(Debug, Clone)]
pub struct PayloadBuilderAttributes {
    id: PayloadId,
    parent: B256,
    attributes: PayloadAttributes,
}

impl PayloadBuilderAttributes {
    pub fn new(parent: B256, attributes: PayloadAttributes) -> Self {
        let id = derive_payload_id(&parent, &attributes);
        Self { id, parent, attributes }
    }

    pub const fn id(&self) -> PayloadId {
        self.id
    }

    pub const fn parent(&self) -> B256 {
        self.parent
    }

    pub const fn attributes(&self) -> &PayloadAttributes {
        &self.attributes
    }

    pub fn timestamp(&self) -> u64 {
        self.attributes.timestamp()
    }
}

/// The output of a completed payload build job, stored under its `PayloadId` and
/// served back out by `getPayload*`.
#[derive(Debug, Clone)]
pub struct BuiltPayload {
    id: PayloadId,
    payload: ExecutionPayload,
    fees: U256,
    blobs_bundle: Option<BlobsBundle>,
    execution_requests: Option<Vec<Bytes>>,
    should_override_builder: bool,
}

impl BuiltPayload {
    pub fn new(id: PayloadId, payload: ExecutionPayload, fees: U256) -> Self {
        Self {
            id,
            payload,
            fees,
            blobs_bundle: None,
            execution_requests: None,
            should_override_builder: false,
        }
    }

    pub const fn id(&self) -> PayloadId {
        self.id
    }

    pub const fn payload(&self) -> &ExecutionPayload {
        &self.payload
    }

    pub const fn fees(&self) -> U256 {
        self.fees
    }

    pub fn with_blobs_bundle(mut self, bundle: BlobsBundle) -> Self {
        self.blobs_bundle = Some(bundle);
        self
    }

    pub fn with_execution_requests(mut self, requests: Vec<Bytes>) -> Self {
        self.execution_requests = Some(requests);
        self
    }

    pub fn with_should_override_builder(mut self, should_override: bool) -> Self {
        self.should_override_builder = should_override;
        self
    }

    /// Converts into the `engine_getPayloadVN` response envelope.
    pub fn into_response(self) -> GetPayloadResponse {
        let blobs_bundle = self.blobs_bundle.map(|bundle| engine_primitives::BlobsBundleV1 {
            commitments: bundle.commitments,
            proofs: bundle.proofs,
            blobs: bundle.blobs,
        });

        GetPayloadResponse {
            execution_payload: self.payload,
            block_value: self.fees,
            blobs_bundle,
            should_override_builder: self.should_override_builder,
            execution_requests: self.execution_requests,
        }
    }
}
