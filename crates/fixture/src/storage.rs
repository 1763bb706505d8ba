//! Storage key arithmetic on fixture documents.
//!
//! Keys are big-endian 256-bit integers written as hex strings. Replicated
//! keys are always written as full 32-byte words.
use alloy_primitives::U256;
use serde_json::{Map, Value};

use crate::{serde_helpers::word_hex, FixtureError};

/// Parses a `0x`-prefixed hex storage key.
pub fn parse_key(key: &str) -> Result<U256, FixtureError> {
    let invalid = |reason: String| FixtureError::InvalidStorageKey {
        key: key.to_string(),
        reason,
    };
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    if digits.is_empty() {
        return Err(invalid("no digits".to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|e| invalid(e.to_string()))
}

/// Returns the storage key `offset` slots after `key`.
pub fn offset_key(key: &str, offset: u64) -> Result<U256, FixtureError> {
    parse_key(key)?
        .checked_add(U256::from(offset))
        .ok_or_else(|| FixtureError::StorageKeyOverflow {
            key: key.to_string(),
            offset,
        })
}

/// Copies every entry of `storage` into the `slot_count - 1` slots following
/// its key and returns the result sorted by key string.
///
/// Keys are processed in document order and each one copies its value as it
/// stands at that point. A base key already overwritten by an earlier key's
/// replicas passes the overwritten value on, so for keys in ascending order
/// every replica equals its base key in the result.
pub fn replicate_slots(
    storage: &Map<String, Value>,
    slot_count: usize,
) -> Result<Map<String, Value>, FixtureError> {
    let mut replicated = storage.clone();
    for key in storage.keys() {
        let Some(value) = replicated.get(key).cloned() else {
            continue;
        };
        for offset in 1..slot_count as u64 {
            let slot = offset_key(key, offset)?;
            replicated.insert(word_hex(slot), value.clone());
        }
    }
    Ok(sorted(replicated))
}

/// Re-orders a JSON object by key string.
pub fn sorted(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries.into_iter().collect()
}
