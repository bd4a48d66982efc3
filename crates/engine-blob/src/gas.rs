use crate::config::BlobScheduleConfig;

/// Gas charged for `n` blobs under `config`.
pub const fn compute_blob_gas(n: u64, config: &BlobScheduleConfig) -> u64 {
    n * config.blob_gas_per_blob
}

/// `max(0, parentExcess + parentUsed - target * BlobGasPerBlob)`.
pub fn compute_excess_blob_gas(
    parent_excess_blob_gas: u64,
    parent_blob_gas_used: u64,
    config: &BlobScheduleConfig,
) -> u64 {
    let total = parent_excess_blob_gas.saturating_add(parent_blob_gas_used);
    total.saturating_sub(config.target_blob_gas_per_block())
}

/// The "fake exponential" `fake_exp(1, num, denom)` used by both the blob base fee
/// (EIP-4844) and, with different constants, the base-fee recurrence of other EIPs:
/// runs the Taylor series `Σ_{i≥1} num^i / (denom^i * i!)` in integer arithmetic,
/// truncating each term towards zero, and stops as soon as a term rounds to zero.
/// The running sum starts at `denom` (the `i = 0` term, `num^0/denom^0 = 1`, scaled
/// by `denom` to preserve precision) and the final result is divided back down by
/// `denom`, floored at 1.
fn fake_exponential(factor: u128, num: u128, denom: u128) -> u128 {
    let mut i = 1u128;
    let mut output = 0u128;
    let mut numerator_accum = factor * denom;

    while numerator_accum > 0 {
        output += numerator_accum;
        numerator_accum = (numerator_accum * num) / (denom * i);
        i += 1;
    }

    let result = output / denom;
    result.max(1)
}

/// `computeBlobBaseFee(excess)`: the fake-exponential blob base fee for a given
/// excess blob gas value. Monotone non-decreasing in `excess`.
pub fn compute_blob_base_fee(excess_blob_gas: u64, config: &BlobScheduleConfig) -> u128 {
    fake_exponential(1, excess_blob_gas as u128, config.blob_base_fee_update_fraction as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_excess_gives_floor_base_fee() {
        let config = BlobScheduleConfig::default();
        assert_eq!(compute_blob_base_fee(0, &config), 1);
    }

    #[test]
    fn base_fee_is_monotone_non_decreasing() {
        let config = BlobScheduleConfig::default();
        let mut prev = compute_blob_base_fee(0, &config);
        for excess in (0..10_000_000u64).step_by(250_000) {
            let next = compute_blob_base_fee(excess, &config);
            assert!(next >= prev, "base fee decreased at excess={excess}");
            prev = next;
        }
    }

    #[test]
    fn excess_blob_gas_is_zero_below_target() {
        let config = BlobScheduleConfig::default();
        assert_eq!(compute_excess_blob_gas(0, 0, &config), 0);
        assert_eq!(compute_excess_blob_gas(0, config.target_blob_gas_per_block(), &config), 0);
    }

    #[test]
    fn excess_blob_gas_accumulates_above_target() {
        let config = BlobScheduleConfig::default();
        let over_target = config.target_blob_gas_per_block() + config.blob_gas_per_blob;
        assert_eq!(compute_excess_blob_gas(0, over_target, &config), config.blob_gas_per_blob);
    }

    #[test]
    fn blob_gas_scales_linearly_with_blob_count() {
        let config = BlobScheduleConfig::default();
        assert_eq!(compute_blob_gas(3, &config), 3 * config.blob_gas_per_blob);
    }
}
