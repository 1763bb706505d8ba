//! Types and helpers for Ethereum state test fixtures.
//!
//! A fixture maps test names to units holding a pre-state and an ordered
//! transaction list. The typed model lives in [`FixtureSuite`]; the helper
//! modules cover the pieces of fixture handling that are not plain serde:
//! storage key arithmetic, wei display, and calldata classification.
mod account_info;
pub mod calldata;
mod env;
mod error;
pub mod serde_helpers;
pub mod storage;
mod test_suite;
mod test_unit;
mod transaction;
pub mod units;

pub use account_info::*;
pub use env::*;
pub use error::*;
pub use test_suite::*;
pub use test_unit::*;
pub use transaction::*;

pub use alloy_primitives::{self as primitives, Address, Bytes, B256, U256};
