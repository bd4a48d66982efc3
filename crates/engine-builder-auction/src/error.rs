use alloy_primitives::Bytes;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("stake {0} is below the minimum of 1 ETH")]
    InsufficientStake(alloy_primitives::U256),
    #[error("builder already registered")]
    BuilderAlreadyExists,
    #[error("builder not found")]
    BuilderNotFound,
    #[error("builder is not active")]
    BuilderNotActive,
    #[error("BLS signature verification failed")]
    InvalidSignature,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BidError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("bid value must be greater than zero")]
    ZeroValue,
    #[error("bid block hash must be non-zero")]
    ZeroBlockHash,
    #[error("bid parent block hash must be non-zero")]
    ZeroParentBlockHash,
    #[error("no bids available for slot {0}")]
    NoBidsAvailable(u64),
    #[error("BLS signature verification failed")]
    InvalidSignature,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("payload block hash does not match the bid's block hash")]
    BlockHashMismatch,
    #[error("payload parent hash does not match the bid's parent block hash")]
    ParentHashMismatch,
    #[error("payload gas limit does not match the bid's gas limit")]
    GasLimitMismatch,
    #[error("payload fee recipient does not match the bid's fee recipient")]
    FeeRecipientMismatch,
}

pub type BuilderPubkey = Bytes;
