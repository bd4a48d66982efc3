use alloy_primitives::{B256, U256};
use thiserror::Error;

/// Reasons a payload fails intrinsic or parent-relative validation. Distinct from
/// RPC-level errors: these map onto a `PayloadStatus` of `INVALID` or
/// `INVALID_BLOCK_HASH`, never an RPC error response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadValidationError {
    #[error("gas used {gas_used} exceeds gas limit {gas_limit}")]
    GasUsedExceedsLimit { gas_used: u64, gas_limit: u64 },
    #[error("gas limit is zero")]
    ZeroGasLimit,
    #[error("extra data is {0} bytes, exceeding the 32-byte maximum")]
    ExtraDataTooLong(usize),
    #[error("timestamp {timestamp} is not strictly greater than parent timestamp {parent_timestamp}")]
    TimestampNotMonotonic { timestamp: u64, parent_timestamp: u64 },
    #[error("gas limit delta {delta} is not below the bound of {max_delta}")]
    GasLimitDeltaTooLarge { delta: u64, max_delta: u64 },
    #[error("gas limit {0} is below the minimum of 5000")]
    GasLimitBelowMinimum(u64),
    #[error("base fee {actual} does not match the expected recurrence value {expected}")]
    BaseFeeMismatch { expected: U256, actual: U256 },
    #[error("declared block hash {declared} does not match the computed hash {computed}")]
    BlockHashMismatch { declared: B256, computed: B256 },
}
