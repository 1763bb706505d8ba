//! Command line tooling for Ethereum state test fixtures.
pub mod cmd;
pub mod dir_utils;
