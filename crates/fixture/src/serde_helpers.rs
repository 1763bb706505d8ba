//! Hex encodings used by the fixture format.
//!
//! Quantities are written the way fixture fillers emit them: `0x` followed by
//! an even number of lowercase digits (`0x00`, `0x0a`, `0x056bc75e2d63100000`).
//! Storage keys are always full 32-byte words.
use std::collections::BTreeMap;

use alloy_primitives::{hex, Address, U256};
use serde::{de, ser::SerializeMap, Deserialize, Serializer};

/// Encodes a quantity as `0x` + even-length lowercase hex.
pub fn quantity_hex<T: std::fmt::LowerHex>(value: T) -> String {
    let digits = format!("{value:x}");
    if digits.len() % 2 == 0 {
        format!("0x{digits}")
    } else {
        format!("0x0{digits}")
    }
}

/// Encodes a storage key as `0x` + 64 lowercase hex digits.
pub fn word_hex(value: U256) -> String {
    format!("0x{}", hex::encode(value.to_be_bytes::<32>()))
}

pub fn deserialize_str_as_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: de::Deserializer<'de>,
{
    let string = String::deserialize(deserializer)?;

    if let Some(stripped) = string.strip_prefix("0x") {
        u64::from_str_radix(stripped, 16)
    } else {
        string.parse()
    }
    .map_err(serde::de::Error::custom)
}

pub fn deserialize_maybe_empty<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let string = String::deserialize(deserializer)?;
    if string.is_empty() {
        Ok(None)
    } else {
        string.parse().map_err(de::Error::custom).map(Some)
    }
}

pub fn serialize_maybe_empty<S>(value: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(address) => serializer.serialize_str(&format!("{address:#x}")),
        None => serializer.serialize_str(""),
    }
}

pub fn serialize_quantity<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&quantity_hex(value))
}

pub fn serialize_u64_quantity<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&quantity_hex(value))
}

pub fn serialize_storage<S>(storage: &BTreeMap<U256, U256>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(storage.len()))?;
    for (key, value) in storage {
        map.serialize_entry(&word_hex(*key), &quantity_hex(value))?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn quantity_is_even_length() {
        assert_eq!(quantity_hex(U256::ZERO), "0x00");
        assert_eq!(quantity_hex(10u64), "0x0a");
        assert_eq!(quantity_hex(0x0f4240u64), "0x0f4240");
        assert_eq!(
            quantity_hex(U256::from(100_000_000_000_000_000_000u128)),
            "0x056bc75e2d63100000"
        );
    }

    #[test]
    fn word_is_zero_padded() {
        assert_eq!(
            word_hex(U256::from(1)),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(word_hex(U256::MAX), format!("0x{}", "f".repeat(64)));
    }

    #[test]
    fn maybe_empty_address() {
        #[derive(Deserialize, Serialize)]
        struct Tx {
            #[serde(
                deserialize_with = "deserialize_maybe_empty",
                serialize_with = "serialize_maybe_empty"
            )]
            to: Option<Address>,
        }

        let tx: Tx = serde_json::from_str(r#"{"to":""}"#).unwrap();
        assert_eq!(tx.to, None);
        assert_eq!(serde_json::to_string(&tx).unwrap(), r#"{"to":""}"#);

        let json = r#"{"to":"0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba"}"#;
        let tx: Tx = serde_json::from_str(json).unwrap();
        assert!(tx.to.is_some());
        assert_eq!(serde_json::to_string(&tx).unwrap(), json);
    }

    #[test]
    fn nonce_accepts_hex_and_decimal() {
        #[derive(Deserialize)]
        struct Account {
            #[serde(deserialize_with = "deserialize_str_as_u64")]
            nonce: u64,
        }

        let hex: Account = serde_json::from_str(r#"{"nonce":"0x10"}"#).unwrap();
        let dec: Account = serde_json::from_str(r#"{"nonce":"16"}"#).unwrap();
        assert_eq!(hex.nonce, 16);
        assert_eq!(dec.nonce, 16);
    }
}
