use std::time::{Duration, Instant};

use engine_primitives::{GetPayloadResponse, PayloadId};
use parking_lot::Mutex;
use schnellru::{ByLength, LruMap};

/// Default capacity: enough recently-built payloads to cover a few missed
/// `getPayload` calls without unbounded growth.
const DEFAULT_CAPACITY: u32 = 64;

/// Default time a cached response remains servable before it is treated as
/// stale and evicted on next access.
const DEFAULT_TTL: Duration = Duration::from_secs(12);

struct Entry {
    response: GetPayloadResponse,
    inserted_at: Instant,
}

/// Single-writer-on-build-completion, many-reader-on-`getPayload*` cache of
/// built payload responses, with LRU eviction bounding memory and a TTL
/// bounding staleness.
pub struct PayloadCache {
    ttl: Duration,
    inner: Mutex<LruMap<PayloadId, Entry, ByLength>>,
}

impl PayloadCache {
    pub fn new() -> Self {
        Self::with_capacity_and_ttl(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    pub fn with_capacity_and_ttl(capacity: u32, ttl: Duration) -> Self {
        Self { ttl, inner: Mutex::new(LruMap::new(ByLength::new(capacity))) }
    }

    pub fn insert(&self, id: PayloadId, response: GetPayloadResponse) {
        self.inner.lock().insert(id, Entry { response, inserted_at: Instant::now() });
    }

    /// Returns the cached response for `id` if present and not yet expired.
    /// An expired entry is evicted as a side effect of the lookup.
    pub fn get(&self, id: &PayloadId) -> Option<GetPayloadResponse> {
        let mut guard = self.inner.lock();
        let expired = guard.get(id).is_some_and(|entry| entry.inserted_at.elapsed() > self.ttl);
        if expired {
            guard.remove(id);
            return None;
        }
        guard.get(id).map(|entry| entry.response.clone())
    }
}

impl Default for PayloadCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;
    use engine_primitives::{ExecutionPayload, ExecutionPayloadV1, B256, U256};

    fn sample_response() -> GetPayloadResponse {
        GetPayloadResponse {
            execution_payload: ExecutionPayload::V1(ExecutionPayloadV1 {
                parent_hash: B256::ZERO,
                fee_recipient: Default::default(),
                state_root: B256::ZERO,
                receipts_root: B256::ZERO,
                logs_bloom: Default::default(),
                prev_randao: B256::ZERO,
                block_number: 1,
                gas_limit: 30_000_000,
                gas_used: 0,
                timestamp: 0,
                extra_data: Bytes::new(),
                base_fee_per_gas: U256::from(1),
                block_hash: B256::ZERO,
                transactions: vec![],
            }),
            block_value: U256::ZERO,
            blobs_bundle: None,
            should_override_builder: false,
            execution_requests: None,
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = PayloadCache::new();
        let id = PayloadId::new([1u8; 8]);
        cache.insert(id, sample_response());
        assert!(cache.get(&id).is_some());
    }

    #[test]
    fn expired_entries_are_evicted_on_access() {
        let cache = PayloadCache::with_capacity_and_ttl(8, Duration::from_secs(0));
        let id = PayloadId::new([2u8; 8]);
        cache.insert(id, sample_response());
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&id).is_none());
    }

    #[test]
    fn missing_entries_return_none() {
        let cache = PayloadCache::new();
        assert!(cache.get(&PayloadId::new([9u8; 8])).is_none());
    }
}
