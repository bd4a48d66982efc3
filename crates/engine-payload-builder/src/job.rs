use alloy_primitives::U256;

/// The subset of a candidate transaction's shape the selection algorithm needs.
/// Transaction decoding and execution are backend concerns; this is deliberately
/// narrow so the selection pipeline never touches an EVM.
pub trait CandidateTransaction {
    /// The gas this transaction declares it will use.
    fn gas_limit(&self) -> u64;
    /// Gas this transaction's blobs would consume, if any; zero for non-blob txs.
    fn blob_gas(&self) -> u64;
    /// `gasPrice - baseFee` for legacy transactions, `min(gasFeeCap - baseFee,
    /// gasTipCap)` for dynamic-fee transactions. `None` when the transaction's fee
    /// cap is below `base_fee` (negative tip) — such transactions are excluded.
    fn effective_tip_per_gas(&self, base_fee: U256) -> Option<U256>;
}

/// Budgets the selection pass must respect.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBudget {
    pub gas_limit: u64,
    pub max_blob_gas: u64,
}

/// The outcome of running [`select_transactions`]: which candidates (by index
/// into the input slice) were included, in inclusion order, and the resulting
/// resource usage and block value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub included: Vec<usize>,
    pub gas_used: u64,
    pub blob_gas_used: u64,
    pub block_value: U256,
}

/// Orders `candidates` descending by effective tip (ties broken by original,
/// i.e. insertion, order via a stable sort), then greedily includes transactions
/// while tracking cumulative gas and blob gas against `budget`, skipping (not
/// stopping at) any transaction that would overflow either budget. Transactions
/// with no effective tip (below base fee) are excluded outright. The caller may
/// supply a `should_stop` callback, checked before each candidate, for
/// cancellation or deadline handling.
pub fn select_transactions<T: CandidateTransaction>(
    candidates: &[T],
    base_fee: U256,
    budget: SelectionBudget,
    mut should_stop: impl FnMut() -> bool,
) -> SelectionOutcome {
    let mut ranked: Vec<(usize, U256)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, tx)| tx.effective_tip_per_gas(base_fee).map(|tip| (i, tip)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut outcome = SelectionOutcome::default();

    for (index, tip) in ranked {
        if should_stop() {
            break;
        }

        let tx = &candidates[index];

        let gas_limit = tx.gas_limit();
        if outcome.gas_used.saturating_add(gas_limit) > budget.gas_limit {
            continue;
        }

        let blob_gas = tx.blob_gas();
        if blob_gas > 0 && outcome.blob_gas_used.saturating_add(blob_gas) > budget.max_blob_gas {
            continue;
        }

        outcome.gas_used += gas_limit;
        outcome.blob_gas_used += blob_gas;
        outcome.block_value += tip * U256::from(gas_limit);
        outcome.included.push(index);
    }

    outcome
}
