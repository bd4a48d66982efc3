use std::collections::HashMap;

use alloy_primitives::{Bytes, U256};
use engine_primitives::{ExecutionPayloadBid, ExecutionPayloadV1};
use parking_lot::RwLock;

use crate::{
    error::{BidError, RevealError},
    registry::BuilderRegistry,
};

/// The outcome of [`SlotAuction::run_auction`]: a Vickrey (second-price) result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionResult {
    pub slot: u64,
    pub winner: ExecutionPayloadBid,
    pub winning_value: U256,
    pub total_bids: usize,
    /// The second-highest bid value, or the winner's own value when only one bid
    /// was submitted.
    pub second_price: U256,
}

/// Per-slot sealed-bid pool, sorted descending by value, plus the registry used
/// to gate bid submission to active builders.
#[derive(Default)]
pub struct SlotAuction {
    registry: std::sync::Arc<BuilderRegistry>,
    slots: RwLock<HashMap<u64, Vec<ExecutionPayloadBid>>>,
}

impl SlotAuction {
    pub fn new(registry: std::sync::Arc<BuilderRegistry>) -> Self {
        Self { registry, slots: RwLock::default() }
    }

    /// Validates and inserts a bid into its slot's pool, maintaining the
    /// descending-by-value order (ties keep existing insertion order, i.e. a new
    /// bid equal in value to an existing one is placed after it).
    pub fn submit_bid(&self, builder_pubkey: &Bytes, bid: ExecutionPayloadBid) -> Result<(), BidError> {
        self.registry.require_active(builder_pubkey)?;

        if bid.value.is_zero() {
            return Err(BidError::ZeroValue);
        }
        if bid.block_hash.is_zero() {
            return Err(BidError::ZeroBlockHash);
        }
        if bid.parent_block_hash.is_zero() {
            return Err(BidError::ZeroParentBlockHash);
        }

        let mut slots = self.slots.write();
        let pool = slots.entry(bid.slot).or_default();
        let position = pool.iter().position(|existing| existing.value < bid.value).unwrap_or(pool.len());
        pool.insert(position, bid);
        Ok(())
    }

    /// The highest-value bid for `slot`.
    pub fn best_bid(&self, slot: u64) -> Result<ExecutionPayloadBid, BidError> {
        let slots = self.slots.read();
        slots
            .get(&slot)
            .and_then(|pool| pool.first())
            .cloned()
            .ok_or(BidError::NoBidsAvailable(slot))
    }

    /// All bids submitted for `slot`, descending by value; empty if none.
    pub fn bids_for_slot(&self, slot: u64) -> Vec<ExecutionPayloadBid> {
        self.slots.read().get(&slot).cloned().unwrap_or_default()
    }

    /// Runs the Vickrey auction for `slot`: winner is the highest bid, clearing
    /// price is the second-highest bid's value, or the winner's own value when
    /// only one bid was submitted.
    pub fn run_auction(&self, slot: u64) -> Result<AuctionResult, BidError> {
        let slots = self.slots.read();
        let pool = slots.get(&slot).ok_or(BidError::NoBidsAvailable(slot))?;
        let winner = pool.first().cloned().ok_or(BidError::NoBidsAvailable(slot))?;
        let second_price = pool.get(1).map(|bid| bid.value).unwrap_or(winner.value);

        Ok(AuctionResult {
            slot,
            winning_value: winner.value,
            winner,
            total_bids: pool.len(),
            second_price,
        })
    }

    /// Drops a slot's bid pool entirely, e.g. on finalization.
    pub fn prune_slot(&self, slot: u64) {
        self.slots.write().remove(&slot);
    }
}

/// Checks that a revealed payload is consistent with the bid that won its slot:
/// block hash, parent hash, gas limit, and fee recipient must all match.
pub fn validate_bid_payload(
    bid: &ExecutionPayloadBid,
    payload: &ExecutionPayloadV1,
) -> Result<(), RevealError> {
    if payload.block_hash != bid.block_hash {
        return Err(RevealError::BlockHashMismatch);
    }
    if payload.parent_hash != bid.parent_block_hash {
        return Err(RevealError::ParentHashMismatch);
    }
    if payload.gas_limit != bid.gas_limit {
        return Err(RevealError::GasLimitMismatch);
    }
    if payload.fee_recipient != bid.fee_recipient {
        return Err(RevealError::FeeRecipientMismatch);
    }
    Ok(())
}
