mod graph;
mod render;

pub use graph::{short_address, Amount, FlowEdge, FlowGraph, FlowNode, TRUNCATE};
pub use render::{image_path, render, Format};

use crate::dir_utils::find_all_json_fixtures;
use clap::Parser;
use fixture::{FixtureError, FixtureSuite};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Error that occurs while visualizing a fixture
#[derive(Debug, Error)]
pub enum Error {
    /// A path given on the command line does not exist.
    #[error("path does not exist: {0}")]
    InvalidPath(PathBuf),
    /// A folder holds no `.json` files.
    #[error("no JSON fixtures found in {0}")]
    NoJsonFiles(PathBuf),
    /// A fixture could not be loaded or lacks the requested unit.
    #[error("{path}: {source}")]
    Fixture {
        /// Fixture path.
        path: PathBuf,
        /// Load or lookup failure.
        source: FixtureError,
    },
    /// `dot` is not installed.
    #[error("Graphviz `dot` executable not found in PATH")]
    GraphvizNotFound,
    /// `dot` exited with a failure status.
    #[error("Graphviz exited with {status:?}: {stderr}")]
    GraphvizFailed {
        /// Exit code, `None` when killed by a signal.
        status: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },
    /// Reading, writing or running a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
}

/// `visualize` subcommand
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Fixture files or folders containing them
    ///
    /// Folders will be searched recursively for files with the extension `.json`.
    #[arg(required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,
    /// Folder the images are written to
    #[arg(short = 'o', long, default_value = "./visualize")]
    pub out_dir: PathBuf,
    /// Image format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Png)]
    pub format: Format,
    /// Test unit to draw, defaults to the first one
    #[arg(short = 'n', long)]
    pub name: Option<String>,
    /// Keep the DOT description next to the image
    #[arg(long)]
    pub keep_source: bool,
    /// Only write the DOT description, do not run Graphviz
    #[arg(long)]
    pub dot_only: bool,
}

impl Cmd {
    /// Runs `visualize` command.
    pub fn run(&self) -> Result<(), Error> {
        for path in &self.paths {
            if !path.exists() {
                return Err(Error::InvalidPath(path.clone()));
            }

            let fixtures = find_all_json_fixtures(path);
            if fixtures.is_empty() {
                return Err(Error::NoJsonFiles(path.clone()));
            }

            for fixture in fixtures {
                let written = self.visualize(&fixture)?;
                println!("{} -> {}", fixture.display(), written.display());
            }
        }
        Ok(())
    }

    /// Draws one fixture and returns the file written: the image, or the DOT
    /// description with `--dot-only`.
    pub fn visualize(&self, path: &Path) -> Result<PathBuf, Error> {
        let fixture_error = |source| Error::Fixture {
            path: path.to_path_buf(),
            source,
        };
        let suite = FixtureSuite::from_path(path).map_err(fixture_error)?;
        let (name, unit) = suite.unit(self.name.as_deref()).map_err(fixture_error)?;

        let flow = FlowGraph::from_unit(unit);
        info!(
            "{}[{name}]: {} accounts, {} of {} transactions drawn",
            path.display(),
            flow.node_count(),
            flow.edge_count(),
            unit.transaction.len()
        );

        fs::create_dir_all(&self.out_dir).map_err(|source| Error::Io {
            path: self.out_dir.clone(),
            source,
        })?;
        let source = self.out_dir.join(output_stem(path));
        fs::write(&source, flow.to_dot("Transaction Flow")).map_err(|e| Error::Io {
            path: source.clone(),
            source: e,
        })?;

        if self.dot_only {
            return Ok(source);
        }

        let image = render(&source, self.format)?;
        if !self.keep_source {
            fs::remove_file(&source).map_err(|e| Error::Io {
                path: source.clone(),
                source: e,
            })?;
        }
        Ok(image)
    }
}

/// File name of `path` up to its first `.`.
pub fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        assert_eq!(output_stem(Path::new("./data/m2o-10k-100g-erc20.json")), "m2o-10k-100g-erc20");
        assert_eq!(output_stem(Path::new("a/b.c.json")), "b");
        assert_eq!(output_stem(Path::new(".hidden")), ".hidden");
    }
}
