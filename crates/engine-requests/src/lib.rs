//! EIP-7685 execution-requests parsing, validation, and root-hash computation.

use alloy_primitives::{keccak256, Bytes, B256};
use thiserror::Error;

/// A known EIP-7685 request type, in ascending wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RequestType {
    Deposit = 0x00,
    Withdrawal = 0x01,
    Consolidation = 0x02,
}

impl RequestType {
    /// The fixed record size, in bytes, for a single item of this type.
    pub const fn record_size(self) -> usize {
        match self {
            Self::Deposit => 192,
            Self::Withdrawal => 76,
            Self::Consolidation => 116,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Deposit),
            0x01 => Some(Self::Withdrawal),
            0x02 => Some(Self::Consolidation),
            _ => None,
        }
    }
}

/// Maximum number of items accepted for a single request type within one block.
pub const MAX_ITEMS_PER_TYPE: usize = 16;

/// Failures the request-list validator can report, evaluated in the order given
/// here and stopping at the first one encountered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestsError {
    #[error("request entry {0} has length < 2")]
    EntryTooShort(usize),
    #[error("request types are not strictly ascending: {0:#04x} did not follow {1:#04x}")]
    TypesNotAscending(u8, u8),
    #[error("unknown request type {0:#04x}")]
    UnknownType(u8),
    #[error("request type {0:#04x} has data length {1}, not a non-zero multiple of {2}")]
    BadRecordLength(u8, usize, usize),
    #[error("request type {0:#04x} has {1} items, exceeding the cap of {MAX_ITEMS_PER_TYPE}")]
    TooManyItems(u8, usize),
}

/// A single parsed `{type, data}` entry from the raw request list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub request_type: RequestType,
    pub data: Bytes,
}

/// Parses and validates a raw list of requests (each a type byte followed by its
/// record data), applying the predicates in EIP-7685 order: non-null list is
/// assumed (an empty `Vec` is valid and yields no requests), every entry has
/// length ≥ 2, types are strictly ascending with no duplicates, each type is
/// known, each type's data length is a non-zero multiple of its fixed record
/// size, and the item count per type is capped.
pub fn parse_requests(raw: &[Bytes]) -> Result<Vec<ExecutionRequest>, RequestsError> {
    let mut parsed = Vec::with_capacity(raw.len());
    let mut last_type: Option<u8> = None;

    for (i, entry) in raw.iter().enumerate() {
        if entry.len() < 2 {
            return Err(RequestsError::EntryTooShort(i));
        }

        let type_byte = entry[0];
        if let Some(last) = last_type {
            if type_byte <= last {
                return Err(RequestsError::TypesNotAscending(type_byte, last));
            }
        }
        last_type = Some(type_byte);

        let request_type = RequestType::from_byte(type_byte)
            .ok_or(RequestsError::UnknownType(type_byte))?;

        let data = &entry[1..];
        let record_size = request_type.record_size();
        if data.is_empty() || data.len() % record_size != 0 {
            return Err(RequestsError::BadRecordLength(type_byte, data.len(), record_size));
        }

        let item_count = data.len() / record_size;
        if item_count > MAX_ITEMS_PER_TYPE {
            return Err(RequestsError::TooManyItems(type_byte, item_count));
        }

        parsed.push(ExecutionRequest { request_type, data: Bytes::copy_from_slice(data) });
    }

    Ok(parsed)
}

/// `keccak256(concat(raw_1 ‖ raw_2 ‖ …))`; the empty list maps to the zero hash.
pub fn requests_hash(raw: &[Bytes]) -> B256 {
    if raw.is_empty() {
        return B256::ZERO;
    }

    let mut buf = Vec::new();
    for entry in raw {
        buf.extend_from_slice(entry);
    }
    keccak256(&buf)
}
