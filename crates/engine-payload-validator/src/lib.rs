//! Intrinsic and parent-relative execution payload validation, the EIP-1559
//! base-fee recurrence, and block-hash consistency checking.

mod error;

use alloy_primitives::U256;
use engine_primitives::ExecutionPayloadV1;

pub use error::PayloadValidationError;

/// Maximum length of the `extraData` field, in bytes.
pub const MAX_EXTRA_DATA_BYTES: usize = 32;

/// Minimum allowed `gasLimit`.
pub const MIN_GAS_LIMIT: u64 = 5000;

/// Denominator of both the gas-limit adjustment bound and the base-fee delta.
const ELASTICITY_MULTIPLIER_DENOMINATOR: u64 = 1024;
const BASE_FEE_MAX_CHANGE_DENOMINATOR: u64 = 8;

/// Checks that hold for a payload in isolation, independent of its parent.
pub fn check_intrinsic(payload: &ExecutionPayloadV1) -> Result<(), PayloadValidationError> {
    if payload.gas_used > payload.gas_limit {
        return Err(PayloadValidationError::GasUsedExceedsLimit {
            gas_used: payload.gas_used,
            gas_limit: payload.gas_limit,
        });
    }

    if payload.gas_limit == 0 {
        return Err(PayloadValidationError::ZeroGasLimit);
    }

    if payload.extra_data.len() > MAX_EXTRA_DATA_BYTES {
        return Err(PayloadValidationError::ExtraDataTooLong(payload.extra_data.len()));
    }

    Ok(())
}

/// The subset of the parent header needed for parent-relative validation and
/// base-fee computation.
#[derive(Debug, Clone, Copy)]
pub struct ParentContext {
    pub timestamp: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub base_fee_per_gas: U256,
}

impl ParentContext {
    /// The elastic gas target: half the gas limit, matching the 2x elasticity
    /// multiplier used since EIP-1559.
    pub const fn gas_target(&self) -> u64 {
        self.gas_limit / 2
    }
}

/// `CalcBaseFee`: the next base fee given the parent's usage relative to its
/// target. Unchanged when usage equals target; rises when over target (by at
/// least 1 wei); falls when under target (floored at 0).
pub fn calc_base_fee(parent: &ParentContext) -> U256 {
    let target = parent.gas_target();

    match parent.gas_used.cmp(&target) {
        std::cmp::Ordering::Equal => parent.base_fee_per_gas,
        std::cmp::Ordering::Greater => {
            let gas_used_delta = parent.gas_used - target;
            let delta = std::cmp::max(
                U256::from(1),
                parent.base_fee_per_gas * U256::from(gas_used_delta)
                    / U256::from(target)
                    / U256::from(BASE_FEE_MAX_CHANGE_DENOMINATOR),
            );
            parent.base_fee_per_gas + delta
        }
        std::cmp::Ordering::Less => {
            let gas_used_delta = target - parent.gas_used;
            let delta = parent.base_fee_per_gas * U256::from(gas_used_delta)
                / U256::from(target)
                / U256::from(BASE_FEE_MAX_CHANGE_DENOMINATOR);
            parent.base_fee_per_gas.saturating_sub(delta)
        }
    }
}

/// Checks a payload's header fields against its parent: strict timestamp
/// monotonicity, the bounded-and-floored gas-limit delta, and the base-fee
/// recurrence.
pub fn check_parent_relative(
    payload: &ExecutionPayloadV1,
    parent: &ParentContext,
) -> Result<(), PayloadValidationError> {
    if payload.timestamp <= parent.timestamp {
        return Err(PayloadValidationError::TimestampNotMonotonic {
            timestamp: payload.timestamp,
            parent_timestamp: parent.timestamp,
        });
    }

    let max_delta = parent.gas_limit / ELASTICITY_MULTIPLIER_DENOMINATOR;
    let delta = payload.gas_limit.abs_diff(parent.gas_limit);
    if delta >= max_delta {
        return Err(PayloadValidationError::GasLimitDeltaTooLarge {
            delta,
            max_delta,
        });
    }
    if payload.gas_limit < MIN_GAS_LIMIT {
        return Err(PayloadValidationError::GasLimitBelowMinimum(payload.gas_limit));
    }

    let expected_base_fee = calc_base_fee(parent);
    if payload.base_fee_per_gas != expected_base_fee {
        return Err(PayloadValidationError::BaseFeeMismatch {
            expected: expected_base_fee,
            actual: payload.base_fee_per_gas,
        });
    }

    Ok(())
}

/// Compares the payload's declared `blockHash` against a hash recomputed by the
/// backend from the header fields. A zero declared hash is treated as "not yet
/// known" and skips the check (the backend is expected to fill it in).
pub fn check_block_hash(
    payload: &ExecutionPayloadV1,
    computed_hash: alloy_primitives::B256,
) -> Result<(), PayloadValidationError> {
    if payload.block_hash.is_zero() {
        return Ok(());
    }
    if payload.block_hash != computed_hash {
        return Err(PayloadValidationError::BlockHashMismatch {
            declared: payload.block_hash,
            computed: computed_hash,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bloom, Bytes, B256};

    fn payload(gas_used: u64, gas_limit: u64, timestamp: u64, base_fee: u64) -> ExecutionPayloadV1 {
        ExecutionPayloadV1 {
            parent_hash: B256::ZERO,
            fee_recipient: Address::ZERO,
            state_root: B256::ZERO,
            receipts_root: B256::ZERO,
            logs_bloom: Bloom::ZERO,
            prev_randao: B256::ZERO,
            block_number: 1,
            gas_limit,
            gas_used,
            timestamp,
            extra_data: Bytes::new(),
            base_fee_per_gas: U256::from(base_fee),
            block_hash: B256::ZERO,
            transactions: vec![],
        }
    }

    #[test]
    fn intrinsic_rejects_gas_used_over_limit() {
        let p = payload(100, 50, 1, 7);
        assert!(matches!(
            check_intrinsic(&p),
            Err(PayloadValidationError::GasUsedExceedsLimit { .. })
        ));
    }

    #[test]
    fn intrinsic_rejects_zero_gas_limit() {
        let p = payload(0, 0, 1, 7);
        assert!(matches!(check_intrinsic(&p), Err(PayloadValidationError::ZeroGasLimit)));
    }

    #[test]
    fn base_fee_unchanged_at_target() {
        let parent = ParentContext {
            timestamp: 0,
            gas_limit: 30_000_000,
            gas_used: 15_000_000,
            base_fee_per_gas: U256::from(1_000_000_000u64),
        };
        assert_eq!(calc_base_fee(&parent), parent.base_fee_per_gas);
    }

    #[test]
    fn base_fee_rises_above_target() {
        let parent = ParentContext {
            timestamp: 0,
            gas_limit: 30_000_000,
            gas_used: 30_000_000,
            base_fee_per_gas: U256::from(1_000_000_000u64),
        };
        assert!(calc_base_fee(&parent) > parent.base_fee_per_gas);
    }

    #[test]
    fn base_fee_falls_below_target() {
        let parent = ParentContext {
            timestamp: 0,
            gas_limit: 30_000_000,
            gas_used: 0,
            base_fee_per_gas: U256::from(1_000_000_000u64),
        };
        assert!(calc_base_fee(&parent) < parent.base_fee_per_gas);
    }

    #[test]
    fn parent_relative_rejects_non_monotonic_timestamp() {
        let parent = ParentContext {
            timestamp: 100,
            gas_limit: 30_000_000,
            gas_used: 15_000_000,
            base_fee_per_gas: U256::from(1_000_000_000u64),
        };
        let expected_base_fee = calc_base_fee(&parent);
        let p = payload(
            15_000_000,
            30_000_000,
            100,
            expected_base_fee.try_into().unwrap(),
        );
        assert!(matches!(
            check_parent_relative(&p, &parent),
            Err(PayloadValidationError::TimestampNotMonotonic { .. })
        ));
    }

    #[test]
    fn parent_relative_rejects_gas_limit_jump() {
        let parent = ParentContext {
            timestamp: 0,
            gas_limit: 30_000_000,
            gas_used: 15_000_000,
            base_fee_per_gas: U256::from(1_000_000_000u64),
        };
        let expected_base_fee: u64 = calc_base_fee(&parent).try_into().unwrap();
        let p = payload(15_000_000, 30_100_000, 1, expected_base_fee);
        assert!(matches!(
            check_parent_relative(&p, &parent),
            Err(PayloadValidationError::GasLimitDeltaTooLarge { .. })
        ));
    }

    #[test]
    fn block_hash_mismatch_is_rejected() {
        let p = ExecutionPayloadV1 { block_hash: B256::repeat_byte(1), ..payload(0, 30_000_000, 1, 7) };
        let err = check_block_hash(&p, B256::repeat_byte(2)).unwrap_err();
        assert!(matches!(err, PayloadValidationError::BlockHashMismatch { .. }));
    }

    #[test]
    fn zero_declared_block_hash_skips_the_check() {
        let p = payload(0, 30_000_000, 1, 7);
        assert!(check_block_hash(&p, B256::repeat_byte(2)).is_ok());
    }
}
