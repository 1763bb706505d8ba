use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{deserialize_maybe_empty, serialize_maybe_empty, serialize_quantity};

/// A single fully specified transaction of a fixture.
///
/// Unlike upstream state tests, where one transaction template is expanded over
/// `data`/`gas`/`value` vectors, these fixtures list every transaction
/// explicitly and execute them in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTransaction {
    /// Call payload.
    #[serde(default)]
    pub data: Bytes,
    /// Gas limit of the transaction.
    #[serde(default, serialize_with = "serialize_quantity")]
    pub gas_limit: U256,
    /// Legacy gas price in wei.
    #[serde(default, serialize_with = "serialize_quantity")]
    pub gas_price: U256,
    /// Sender nonce.
    #[serde(default, serialize_with = "serialize_quantity")]
    pub nonce: U256,
    /// Signing key of `sender`.
    #[serde(default)]
    pub secret_key: B256,
    /// Sending account.
    pub sender: Address,
    /// Recipient. `None` for contract creation.
    #[serde(
        default,
        deserialize_with = "deserialize_maybe_empty",
        serialize_with = "serialize_maybe_empty"
    )]
    pub to: Option<Address>,
    /// Transferred value in wei.
    #[serde(default, serialize_with = "serialize_quantity")]
    pub value: U256,
}

impl FixtureTransaction {
    /// Returns the 4-byte function selector of the payload, if there is one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}
