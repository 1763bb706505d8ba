mod patterns;
mod wallet;

pub use patterns::{
    balance_slot, Pattern, PatternParams, TransactionGenerator, DEFAULT_BALANCE, ERC20_ADDRESS,
};
pub use wallet::Wallet;

use clap::Parser;
use fixture::{Bytes, FixtureSuite};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::{fs, path::PathBuf, str::FromStr};
use thiserror::Error;

/// Name of the single unit in generated fixtures.
pub const UNIT_NAME: &str = "just-test";

/// Error that occurs while generating a fixture
#[derive(Debug, Error)]
pub enum Error {
    /// Pattern parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// The token bytecode file is not hex or is empty.
    #[error("invalid bytecode in {path}: {reason}")]
    InvalidBytecode {
        /// Bytecode file.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// The fixture could not be serialized.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// `generate` subcommand
///
/// Patterns:
///
///   one-to-many   o -> o o o o   one sender per group
///   many-to-one   o o o o -> o   one receiver per group
///   many-to-many  o o o -> o o o senders and receivers reused at the conflict rate
///   chained       o -> o -> o    each receiver sends on
#[derive(Parser, Debug)]
#[command(after_help = "Examples:\n  \
    fixtool generate -y chained -t 50\n  \
    fixtool generate -y m2m -t 1000 -c 0.7 --erc20 --erc20-bytecode erc20.bytecode -o data/m2m.json")]
pub struct Cmd {
    /// Transaction pattern
    #[arg(short = 'y', long, alias = "type", value_enum)]
    pub pattern: Pattern,
    /// Number of transactions to generate
    #[arg(short = 't', long, default_value_t = 20)]
    pub num_transactions: u64,
    /// Number of independent groups
    #[arg(short = 'g', long, default_value_t = 4)]
    pub num_groups: u64,
    /// Probability that a many-to-many transaction reuses an account (0.0 to 1.0)
    #[arg(short = 'c', long, default_value_t = 0.5)]
    pub conflict_rate: f64,
    /// Generate ERC20 `transfer` calls instead of ether transfers
    #[arg(long, requires = "erc20_bytecode")]
    pub erc20: bool,
    /// File holding the hex runtime bytecode of the ERC20 contract
    #[arg(long)]
    pub erc20_bytecode: Option<PathBuf>,
    /// Seed for the random generator, random keys otherwise
    #[arg(short = 's', long)]
    pub seed: Option<u64>,
    /// Output fixture path
    #[arg(short = 'o', long, default_value = "./data/my_test_case.json")]
    pub output: PathBuf,
}

impl Cmd {
    /// Runs `generate` command.
    pub fn run(&self) -> Result<(), Error> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut generator = TransactionGenerator::new(rng);
        if self.erc20 {
            generator = generator.with_token(self.token_bytecode()?);
        }

        generator.generate(&PatternParams {
            pattern: self.pattern,
            num_transactions: self.num_transactions,
            num_groups: self.num_groups,
            conflict_rate: self.conflict_rate,
        })?;
        let unit = generator.into_unit();
        let accounts = unit.pre.len();
        let suite = FixtureSuite::single(UNIT_NAME, unit);

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.output, serde_json::to_string_pretty(&suite)?).map_err(|source| {
            Error::Io {
                path: self.output.clone(),
                source,
            }
        })?;

        info!(
            "{:?}: {} transactions over {accounts} accounts",
            self.pattern, self.num_transactions
        );
        println!("Test cases written to {}", self.output.display());
        Ok(())
    }

    fn token_bytecode(&self) -> Result<Bytes, Error> {
        let Some(path) = &self.erc20_bytecode else {
            return Err(Error::InvalidParams(
                "--erc20 requires --erc20-bytecode".to_string(),
            ));
        };
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let code = Bytes::from_str(contents.trim()).map_err(|e| Error::InvalidBytecode {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        if code.is_empty() {
            return Err(Error::InvalidBytecode {
                path: path.clone(),
                reason: "empty bytecode".to_string(),
            });
        }
        Ok(code)
    }
}
