use fixture::{storage::replicate_slots, FixtureError};
use log::{debug, info, warn};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use super::{RewriteConfig, SlotVariant};

/// Error that occurs while rewriting a fixture
#[derive(Debug, Error)]
pub enum Error {
    /// Several accounts of one unit run the reference bytecode.
    #[error("more than one account in {unit:?} matches the reference bytecode: {accounts:?}")]
    DuplicateMatch { unit: String, accounts: Vec<String> },
    /// No account matches and a match was required.
    #[error("no account in {path} matches the reference bytecode")]
    NoMatch { path: PathBuf },
    /// Configuration values are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The fixture document does not have the expected shape.
    #[error("malformed fixture in {unit:?}: {reason}")]
    Malformed { unit: String, reason: String },
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// Storage keys could not be replicated.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// Invalid JSON in a fixture or configuration file.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

/// A fixture written for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Slot count of the variant.
    pub slot_count: usize,
    /// Fixture written for the variant.
    pub output: PathBuf,
    /// Number of accounts whose code was replaced, at most one per unit.
    pub rewritten: usize,
}

/// Writes one rewritten fixture per configured variant.
///
/// All bytecode files are read before anything is written. Each variant works
/// on a freshly loaded copy of the source fixture.
pub fn run(config: &RewriteConfig) -> Result<Vec<RewriteOutcome>, Error> {
    config.validate()?;

    let reference = read_bytecode(&config.reference_bytecode_path)?;
    let variants = config
        .configurations
        .iter()
        .map(|variant| Ok((variant, read_bytecode(&variant.replacement_path)?)))
        .collect::<Result<Vec<(&SlotVariant, String)>, Error>>()?;

    let mut outcomes = Vec::with_capacity(variants.len());
    for (variant, replacement) in variants {
        let mut document = read_document(&config.source_path)?;
        let rewritten =
            rewrite_document(&mut document, &reference, &replacement, variant.slot_count)?;

        if rewritten == 0 {
            if config.require_match {
                return Err(Error::NoMatch {
                    path: config.source_path.clone(),
                });
            }
            warn!(
                "no account in {} matches the reference bytecode, writing it unchanged",
                config.source_path.display()
            );
        }

        let output = output_path(&config.source_path, &config.family, variant.slot_count)?;
        let contents = serde_json::to_string_pretty(&document)?;
        fs::write(&output, contents).map_err(|source| Error::Io {
            path: output.clone(),
            source,
        })?;
        info!("wrote {}", output.display());

        outcomes.push(RewriteOutcome {
            slot_count: variant.slot_count,
            output,
            rewritten,
        });
    }
    Ok(outcomes)
}

/// Rewrites the account running `reference` code in every unit of `document`.
///
/// The matched account gets `replacement` as code and its storage replicated
/// over `slot_count` consecutive slots, sorted by key. Returns how many
/// accounts were rewritten. More than one match in a unit is an error and
/// leaves `document` untouched.
pub fn rewrite_document(
    document: &mut Value,
    reference: &str,
    replacement: &str,
    slot_count: usize,
) -> Result<usize, Error> {
    let units = document.as_object_mut().ok_or_else(|| Error::Malformed {
        unit: String::new(),
        reason: "fixture is not a JSON object".to_string(),
    })?;

    // Find all matches before touching anything.
    let mut targets = Vec::new();
    for (name, unit) in units.iter() {
        let malformed = |reason: &str| Error::Malformed {
            unit: name.clone(),
            reason: reason.to_string(),
        };
        let pre = unit
            .get("pre")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("missing `pre` object"))?;

        let accounts: Vec<String> = pre
            .iter()
            .filter(|(_, account)| account.get("code").and_then(Value::as_str) == Some(reference))
            .map(|(address, _)| address.clone())
            .collect();

        match accounts.len() {
            0 => debug!("{name}: no account runs the reference bytecode"),
            1 => targets.extend(accounts.into_iter().map(|a| (name.clone(), a))),
            _ => {
                return Err(Error::DuplicateMatch {
                    unit: name.clone(),
                    accounts,
                })
            }
        }
    }

    for (name, address) in &targets {
        let malformed = |reason: String| Error::Malformed {
            unit: name.clone(),
            reason,
        };
        let account = units
            .get_mut(name)
            .and_then(|unit| unit.get_mut("pre"))
            .and_then(|pre| pre.get_mut(address))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| malformed(format!("account {address} is not an object")))?;

        let storage = account
            .get("storage")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed(format!("account {address} has no `storage` object")))?;
        let replicated = replicate_slots(storage, slot_count)?;
        debug!(
            "{name}: {address} storage {} -> {} slots",
            storage.len(),
            replicated.len()
        );

        account.insert("code".to_string(), Value::String(replacement.to_string()));
        account.insert("storage".to_string(), Value::Object(replicated));
    }

    Ok(targets.len())
}

/// Output file for a variant: the family token in the source file name becomes
/// `<family>p-slot<N>`.
///
/// Names without the token get `-<family>p-slot<N>` appended to the stem, so the
/// source is never overwritten.
pub fn output_path(source: &Path, family: &str, slot_count: usize) -> Result<PathBuf, Error> {
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::InvalidConfig(format!("{} is not a file name", source.display()))
        })?;
    let tag = format!("{family}p-slot{slot_count}");

    let name = if file_name.contains(family) {
        file_name.replace(family, &tag)
    } else {
        match file_name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => format!("{stem}-{tag}.{extension}"),
            _ => format!("{file_name}-{tag}"),
        }
    };
    Ok(source.with_file_name(name))
}

fn read_bytecode(path: &Path) -> Result<String, Error> {
    let bytecode = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytecode.trim().to_string())
}

fn read_document(path: &Path) -> Result<Value, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}
