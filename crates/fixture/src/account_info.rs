use std::collections::BTreeMap;

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{
    deserialize_str_as_u64, serialize_quantity, serialize_storage, serialize_u64_quantity,
};

/// Account information
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account balance in wei, zero when absent
    #[serde(default, serialize_with = "serialize_quantity")]
    pub balance: U256,
    /// Account bytecode
    #[serde(default)]
    pub code: Bytes,
    /// Account nonce (transaction count)
    #[serde(
        default,
        deserialize_with = "deserialize_str_as_u64",
        serialize_with = "serialize_u64_quantity"
    )]
    pub nonce: u64,
    /// Account storage (key-value pairs)
    #[serde(default, serialize_with = "serialize_storage")]
    pub storage: BTreeMap<U256, U256>,
}

impl AccountInfo {
    /// An externally owned account holding `balance` wei.
    pub fn funded(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// A contract account with empty balance and storage.
    pub fn contract(code: Bytes) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }
}
