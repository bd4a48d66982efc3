use alloy_primitives::B256;
use tokio::sync::oneshot;

/// Possible error variants during payload building.
#[derive(Debug, thiserror::Error)]
pub enum PayloadBuilderError {
    /// Thrown when the parent block is missing from the backend's view.
    #[error("missing parent block {0}")]
    MissingParentBlock(B256),
    /// A oneshot channel used to round-trip a service command has been closed.
    #[error("sender has been dropped")]
    ChannelClosed,
    /// Error surfaced by the blob subsystem while assembling a `BlobsBundle`.
    #[error("blob error: {0}")]
    Blob(#[from] engine_blob::BlobValidationError),
    /// The requested payload id is not present in the store.
    #[error("unknown payload")]
    UnknownPayload,
    /// Withdrawals were requested before the fork that introduces them activated.
    #[error("withdrawals set before Shanghai activation")]
    WithdrawalsBeforeShanghai,
    /// Any other internal failure, opaque to callers.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<oneshot::error::RecvError> for PayloadBuilderError {
    fn from(_: oneshot::error::RecvError) -> Self {
        PayloadBuilderError::ChannelClosed
    }
}
