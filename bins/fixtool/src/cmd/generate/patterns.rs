use clap::ValueEnum;
use fixture::{
    calldata::encode_transfer,
    primitives::{address, keccak256},
    units::ONE_ETHER,
    AccountInfo, Address, Bytes, Env, FixtureTransaction, FixtureUnit, U256,
};
use rand::Rng;
use serde_json::json;
use std::collections::BTreeMap;

use super::{wallet::Wallet, Error};

/// Balance of every funded account, 100 ether.
pub const DEFAULT_BALANCE: u128 = 100 * ONE_ETHER;

/// Where the token contract is deployed in ERC20 fixtures.
pub const ERC20_ADDRESS: Address = address!("b30df92bb107e6f1e46f7df4fd31a316ceb4e7d9");

const GAS_LIMIT: u64 = 0x0f4240;
const GAS_PRICE: u64 = 0x0a;

/// Decrease of the native value per hop in chained fixtures.
const CHAIN_DECAY: u128 = ONE_ETHER / 100_000;

/// Shape of the generated transaction graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// One sender per group, many receivers
    #[value(alias = "o2m")]
    OneToMany,
    /// Many senders per group, one receiver
    #[value(alias = "m2o")]
    ManyToOne,
    /// Senders and receivers reused at the conflict rate
    #[value(alias = "m2m")]
    ManyToMany,
    /// Each receiver becomes the next sender
    #[value(alias = "chain", alias = "ring")]
    Chained,
}

/// Pattern and sizing of a generated fixture.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternParams {
    /// Shape of the transaction graph.
    pub pattern: Pattern,
    /// Total number of transactions.
    pub num_transactions: u64,
    /// Independent groups; ignored by [`Pattern::ManyToMany`].
    pub num_groups: u64,
    /// Only used by [`Pattern::ManyToMany`].
    pub conflict_rate: f64,
}

impl PatternParams {
    /// Rejects sizes the pattern cannot be built with.
    pub fn validate(&self) -> Result<(), Error> {
        match self.pattern {
            Pattern::ManyToMany => {
                if self.num_transactions <= 4 {
                    return Err(Error::InvalidParams(
                        "number of transactions must be greater than 4".to_string(),
                    ));
                }
                if !(0.0..=1.0).contains(&self.conflict_rate) {
                    return Err(Error::InvalidParams(
                        "conflict rate must be between 0.0 and 1.0".to_string(),
                    ));
                }
            }
            _ => {
                if self.num_groups == 0 {
                    return Err(Error::InvalidParams(
                        "number of groups must be at least 1".to_string(),
                    ));
                }
                if self.num_transactions < self.num_groups {
                    return Err(Error::InvalidParams(
                        "number of transactions must not be less than number of groups"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Size of every group; the first `num_transactions % num_groups` groups
    /// take one extra transaction.
    fn group_sizes(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.num_groups).map(|group| {
            self.num_transactions / self.num_groups
                + u64::from(group < self.num_transactions % self.num_groups)
        })
    }
}

/// Builds the pre-state and transaction list of a fixture.
///
/// With a token contract every transfer becomes a `transfer` call against
/// [`ERC20_ADDRESS`] and funded accounts also receive a token balance.
#[derive(Debug)]
pub struct TransactionGenerator<R> {
    rng: R,
    token: bool,
    pre: BTreeMap<Address, AccountInfo>,
    transactions: Vec<FixtureTransaction>,
}

impl<R: Rng> TransactionGenerator<R> {
    /// A generator drawing keys and choices from `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            token: false,
            pre: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }

    /// Deploys the token contract running `code`.
    pub fn with_token(mut self, code: Bytes) -> Self {
        self.pre.insert(ERC20_ADDRESS, AccountInfo::contract(code));
        self.token = true;
        self
    }

    /// Appends the transactions of `params` and funds their senders.
    pub fn generate(&mut self, params: &PatternParams) -> Result<(), Error> {
        params.validate()?;
        match params.pattern {
            Pattern::OneToMany => self.one_to_many(params),
            Pattern::ManyToOne => self.many_to_one(params),
            Pattern::ManyToMany => self.many_to_many(params),
            Pattern::Chained => self.chained(params),
        }
        Ok(())
    }

    /// Wraps the generated state in a unit with the default block.
    pub fn into_unit(self) -> FixtureUnit {
        FixtureUnit {
            info: Some(info()),
            env: Some(Env::default()),
            pre: self.pre,
            transaction: self.transactions,
            post: Some(json!({
                "Cancun": { "hash": "", "indexes": {}, "logs": "", "txbytes": "" }
            })),
        }
    }

    fn one_to_many(&mut self, params: &PatternParams) {
        for size in params.group_sizes() {
            let sender = self.wallet();
            self.fund(sender.address);
            let value = U256::from(50 * ONE_ETHER / u128::from(size));
            for nonce in 0..size {
                let receiver = self.wallet();
                self.transfer(&sender, nonce, receiver.address, value);
            }
        }
    }

    fn many_to_one(&mut self, params: &PatternParams) {
        for size in params.group_sizes() {
            let receiver = self.wallet();
            for _ in 0..size {
                let sender = self.wallet();
                self.fund(sender.address);
                self.transfer(&sender, 0, receiver.address, U256::from(50 * ONE_ETHER));
            }
        }
    }

    fn chained(&mut self, params: &PatternParams) {
        for size in params.group_sizes() {
            let mut receiver = self.wallet();
            self.fund(receiver.address);
            let mut value = U256::from(50 * ONE_ETHER);

            for _ in 0..size {
                let sender = receiver;
                receiver = self.wallet();
                if self.token {
                    // Receivers pay gas for the next hop.
                    self.fund_native(receiver.address);
                    self.transfer(&sender, 0, receiver.address, value);
                } else {
                    self.transfer(&sender, 0, receiver.address, value);
                    value = value.saturating_sub(U256::from(CHAIN_DECAY));
                }
            }
        }
    }

    fn many_to_many(&mut self, params: &PatternParams) {
        let mut senders_idxs: Vec<u64> = vec![0, 1, 2];
        let mut receivers_idxs: Vec<u64> = vec![0, 1, 2];
        let mut senders_num = 3;
        let mut receivers_num = 3;

        for _ in 3..params.num_transactions {
            if self.rng.random::<f64>() < params.conflict_rate {
                let pattern = self.rng.random::<f64>();
                let selected_sender = random_near(senders_num, &mut self.rng);
                let selected_receiver = random_near(receivers_num, &mut self.rng);
                if pattern < 0.33 {
                    senders_idxs.push(selected_sender);
                    receivers_idxs.push(receivers_num);
                    receivers_num += 1;
                } else if pattern < 0.66 {
                    senders_idxs.push(senders_num);
                    receivers_idxs.push(selected_receiver);
                    senders_num += 1;
                } else {
                    senders_idxs.push(selected_sender);
                    receivers_idxs.push(selected_receiver);
                }
            } else {
                senders_idxs.push(senders_num);
                receivers_idxs.push(receivers_num);
                senders_num += 1;
                receivers_num += 1;
            }
        }

        let senders: Vec<Wallet> = (0..senders_num).map(|_| self.wallet()).collect();
        for sender in &senders {
            self.fund(sender.address);
        }
        let receivers: Vec<Address> = (0..receivers_num).map(|_| self.wallet().address).collect();

        let value = if self.token {
            U256::from(ONE_ETHER)
        } else {
            U256::from(DEFAULT_BALANCE / (u128::from(params.num_transactions) + 1))
        };
        let mut nonces = vec![0u64; senders.len()];
        for (sender_idx, receiver_idx) in senders_idxs.into_iter().zip(receivers_idxs) {
            let sender = &senders[sender_idx as usize];
            let nonce = &mut nonces[sender_idx as usize];
            self.transfer(sender, *nonce, receivers[receiver_idx as usize], value);
            *nonce += 1;
        }
    }

    fn wallet(&mut self) -> Wallet {
        Wallet::random(&mut self.rng)
    }

    /// Funds `account` with ether and, in token mode, with tokens.
    fn fund(&mut self, account: Address) {
        self.fund_native(account);
        if self.token {
            if let Some(token) = self.pre.get_mut(&ERC20_ADDRESS) {
                token
                    .storage
                    .insert(balance_slot(account), U256::from(DEFAULT_BALANCE));
            }
        }
    }

    fn fund_native(&mut self, account: Address) {
        self.pre
            .insert(account, AccountInfo::funded(U256::from(DEFAULT_BALANCE)));
    }

    fn transfer(&mut self, sender: &Wallet, nonce: u64, receiver: Address, value: U256) {
        let (to, data, value) = if self.token {
            (ERC20_ADDRESS, encode_transfer(receiver, value), U256::ZERO)
        } else {
            (receiver, Bytes::new(), value)
        };
        self.transactions.push(FixtureTransaction {
            data,
            gas_limit: U256::from(GAS_LIMIT),
            gas_price: U256::from(GAS_PRICE),
            nonce: U256::from(nonce),
            secret_key: sender.secret_key,
            sender: sender.address,
            to: Some(to),
            value,
        });
    }
}

/// Picks an index below `num`, biased towards the most recent ones.
fn random_near<R: Rng>(num: u64, rng: &mut R) -> u64 {
    let random_small = ((rng.random_range(0..num) * num) as f64).sqrt();
    num - 1 - random_small as u64
}

/// Storage slot of `holder` in a Solidity `mapping(address => uint256)` at slot 0.
pub fn balance_slot(holder: Address) -> U256 {
    let mut preimage = [0u8; 64];
    preimage[12..32].copy_from_slice(holder.as_slice());
    U256::from_be_bytes(keccak256(preimage).0)
}

fn info() -> serde_json::Value {
    json!({
        "comment": "fixtool generated transfers",
        "filling-rpc-server": "evm version 1.13.11-unstable-765f2904-20240124",
        "filling-tool-version": "retesteth-0.3.2-cancun+commit.ea13235b.Linux.g++",
        "generatedTestHash": "7e42d931d6e7a1e308874fd21b386d86daf6af0a52be5c5a1f52f89423b2c28b",
        "lllcversion": "Version: 0.5.14-develop.2023.7.11+commit.c58ab2c6.mod.Linux.g++",
        "solidity": "Version: 0.8.21+commit.d9974bed.Linux.g++",
        "source": "",
        "sourceHash": "5138279197c12e7d349cb50a0f3d9c8ceaef4310463fb11af9b6a346ad5a5918"
    })
}
