use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A validator withdrawal, as carried by `PayloadAttributesV2+` and `ExecutionPayloadV2+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonically increasing identifier issued by the consensus layer.
    #[serde(with = "quantity")]
    pub index: u64,
    /// Index of the validator on whose behalf the withdrawal is made.
    #[serde(with = "quantity")]
    pub validator_index: u64,
    /// Address to be credited.
    pub address: Address,
    /// Amount, denominated in gwei.
    #[serde(with = "quantity")]
    pub amount: u64,
}

mod quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:x}"))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        u64::from_str_radix(s, 16).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_json() {
        let withdrawal =
            Withdrawal { index: 1, validator_index: 2, address: Address::ZERO, amount: 32_000_000_000 };
        let json = serde_json::to_string(&withdrawal).unwrap();
        let decoded: Withdrawal = serde_json::from_str(&json).unwrap();
        assert_eq!(withdrawal, decoded);
    }
}
