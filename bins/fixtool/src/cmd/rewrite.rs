mod config;
mod runner;

pub use config::{RewriteConfig, SlotVariant};
pub use runner::{output_path, rewrite_document, run, Error, RewriteOutcome};

use clap::Parser;
use std::path::PathBuf;

/// `rewrite` subcommand
///
/// Every flag defaults to the layout of the benchmark data directory, so
/// running without arguments rewrites `./data/m2o-10k-100g-erc20.json` with the
/// slot8 to slot256 variants.
#[derive(Parser, Debug, Default)]
pub struct Cmd {
    /// Fixture to rewrite
    pub source: Option<PathBuf>,
    /// File holding the hex bytecode of the contract to replace
    #[arg(short = 'r', long)]
    pub reference: Option<PathBuf>,
    /// Bytecode family token in the fixture file name
    #[arg(long)]
    pub family: Option<String>,
    /// Replacement bytecode and slot count, as `SLOTS:PATH`
    ///
    /// May be given multiple times; one output fixture is written per variant.
    #[arg(short = 'v', long = "variant", value_name = "SLOTS:PATH")]
    pub variants: Vec<SlotVariant>,
    /// Fail when no account matches the reference bytecode
    #[arg(long)]
    pub require_match: bool,
    /// JSON configuration file, replaces all other options
    #[arg(short = 'c', long, conflicts_with_all = ["source", "reference", "family", "variants"])]
    pub config: Option<PathBuf>,
}

impl Cmd {
    /// Resolves the configuration from the config file or the flags.
    pub fn config(&self) -> Result<RewriteConfig, Error> {
        let mut config = match &self.config {
            Some(path) => RewriteConfig::from_path(path)?,
            None => {
                let mut config = RewriteConfig::default();
                if let Some(source) = &self.source {
                    config.source_path = source.clone();
                }
                if let Some(reference) = &self.reference {
                    config.reference_bytecode_path = reference.clone();
                }
                if let Some(family) = &self.family {
                    config.family = family.clone();
                }
                if !self.variants.is_empty() {
                    config.configurations = self.variants.clone();
                }
                config
            }
        };
        config.require_match |= self.require_match;
        Ok(config)
    }

    /// Runs `rewrite` command.
    pub fn run(&self) -> Result<(), Error> {
        let config = self.config()?;
        for outcome in run(&config)? {
            println!(
                "slot{:<4} {} ({} account(s) rewritten)",
                outcome.slot_count,
                outcome.output.display(),
                outcome.rewritten
            );
        }
        Ok(())
    }
}
