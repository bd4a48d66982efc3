use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// The validity verdict a backend returns for `newPayload`/`forkchoiceUpdated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadStatusEnum {
    /// The payload was fully validated and extends the canonical chain.
    Valid,
    /// The payload failed validation.
    Invalid,
    /// The client cannot yet validate the payload because it is still syncing.
    Syncing,
    /// The payload passed structural checks but full validation is deferred.
    Accepted,
    /// `blockHash` did not match the hash recomputed from the payload body.
    InvalidBlockHash,
}

/// Full status response for `newPayload`/`forkchoiceUpdated`: the verdict, the
/// latest hash known to be valid on the chain leading to the submitted payload
/// (populated on `INVALID`), and a human-readable validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatus {
    pub status: PayloadStatusEnum,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_valid_hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl PayloadStatus {
    pub const fn valid(latest_valid_hash: B256) -> Self {
        Self {
            status: PayloadStatusEnum::Valid,
            latest_valid_hash: Some(latest_valid_hash),
            validation_error: None,
        }
    }

    pub const fn syncing() -> Self {
        Self { status: PayloadStatusEnum::Syncing, latest_valid_hash: None, validation_error: None }
    }

    pub const fn accepted() -> Self {
        Self { status: PayloadStatusEnum::Accepted, latest_valid_hash: None, validation_error: None }
    }

    pub fn invalid(validation_error: impl Into<String>) -> Self {
        Self {
            status: PayloadStatusEnum::Invalid,
            latest_valid_hash: None,
            validation_error: Some(validation_error.into()),
        }
    }

    pub fn invalid_block_hash(validation_error: impl Into<String>) -> Self {
        Self {
            status: PayloadStatusEnum::InvalidBlockHash,
            latest_valid_hash: None,
            validation_error: Some(validation_error.into()),
        }
    }

    pub const fn with_latest_valid_hash(mut self, hash: B256) -> Self {
        self.latest_valid_hash = Some(hash);
        self
    }
}
