pub mod generate;
pub mod rewrite;
pub mod visualize;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "fixtool", infer_subcommands = true)]
#[allow(clippy::large_enum_variant)]
pub enum MainCmd {
    /// Swap a token contract's bytecode and replicate its storage slots.
    ///
    /// Writes one fixture per replacement bytecode next to the source.
    Rewrite(rewrite::Cmd),
    /// Render the transaction flow of fixtures with Graphviz.
    Visualize(visualize::Cmd),
    /// Generate a fixture from a transaction pattern.
    Generate(generate::Cmd),
}

/// Error of any subcommand
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `rewrite` failed.
    #[error(transparent)]
    Rewrite(#[from] rewrite::Error),
    /// `visualize` failed.
    #[error(transparent)]
    Visualize(#[from] visualize::Error),
    /// `generate` failed.
    #[error(transparent)]
    Generate(#[from] generate::Error),
}

impl MainCmd {
    /// Runs the selected subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Rewrite(cmd) => cmd.run().map_err(Into::into),
            Self::Visualize(cmd) => cmd.run().map_err(Into::into),
            Self::Generate(cmd) => cmd.run().map_err(Into::into),
        }
    }
}
