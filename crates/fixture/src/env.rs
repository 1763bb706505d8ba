use alloy_primitives::{address, b256, Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::serde_helpers::serialize_quantity;

/// Block environment of a fixture.
///
/// Fields missing from a fixture take their [`Default`] value, so partial
/// blocks written by other tools still load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Env {
    /// EIP-1559 base fee
    #[serde(serialize_with = "serialize_quantity")]
    pub current_base_fee: U256,
    /// Block beneficiary
    pub current_coinbase: Address,
    /// Block difficulty
    #[serde(serialize_with = "serialize_quantity")]
    pub current_difficulty: U256,
    /// EIP-4844 excess blob gas
    #[serde(serialize_with = "serialize_quantity")]
    pub current_excess_blob_gas: U256,
    /// Block gas limit
    #[serde(serialize_with = "serialize_quantity")]
    pub current_gas_limit: U256,
    /// Block number
    #[serde(serialize_with = "serialize_quantity")]
    pub current_number: U256,
    /// `PREVRANDAO` value
    pub current_random: B256,
    /// Block timestamp in seconds
    #[serde(serialize_with = "serialize_quantity")]
    pub current_timestamp: U256,
}

impl Default for Env {
    /// The block used by generated fixtures: block 1 with a 100M gas limit.
    fn default() -> Self {
        Self {
            current_base_fee: U256::from(0x0a),
            current_coinbase: address!("2adc25665018aa1fe0e6bc666dac8fc2697ff9ba"),
            current_difficulty: U256::from(0x020000),
            current_excess_blob_gas: U256::ZERO,
            current_gas_limit: U256::from(0x05f5e100),
            current_number: U256::from(1),
            current_random: b256!(
                "0000000000000000000000000000000000000000000000000000000000020000"
            ),
            current_timestamp: U256::from(0x03e8),
        }
    }
}
