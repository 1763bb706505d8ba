use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{AccountInfo, Env, FixtureTransaction};
use alloy_primitives::{Address, U256};

/// Single fixture unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureUnit {
    /// Filler metadata, carried through untouched.
    #[serde(default, rename = "_info", skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
    /// Block environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Env>,
    /// Accounts present before the first transaction.
    pub pre: BTreeMap<Address, AccountInfo>,
    /// Transactions in execution order.
    pub transaction: Vec<FixtureTransaction>,
    /// Expected post state, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<serde_json::Value>,
}

impl FixtureUnit {
    /// Pre-state balance of `address`, zero for accounts missing from `pre`.
    pub fn balance_of(&self, address: &Address) -> U256 {
        self.pre
            .get(address)
            .map_or(U256::ZERO, |account| account.balance)
    }
}
