use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use super::Error;

/// Which fixture to rewrite and which bytecode variants to produce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    /// Fixture to rewrite.
    pub source_path: PathBuf,
    /// File with the bytecode an account must have to be rewritten.
    pub reference_bytecode_path: PathBuf,
    /// Token in the source file name replaced by `<family>p-slot<N>`.
    #[serde(default = "default_family")]
    pub family: String,
    /// Treat a fixture without any matching account as an error.
    #[serde(default)]
    pub require_match: bool,
    /// Variants to produce, one output fixture each.
    pub configurations: Vec<SlotVariant>,
}

/// One output fixture: replacement bytecode and how many slots each storage
/// entry occupies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotVariant {
    /// File with the hex bytecode written into the matched account.
    pub replacement_path: PathBuf,
    /// Consecutive slots each storage entry is copied into, base slot included.
    pub slot_count: usize,
}

fn default_family() -> String {
    "erc20".to_string()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            source_path: "./data/m2o-10k-100g-erc20.json".into(),
            reference_bytecode_path: "./scripts/bytecode/erc20.bytecode".into(),
            family: default_family(),
            require_match: false,
            configurations: [8, 16, 32, 64, 128, 256]
                .into_iter()
                .map(|slot_count| SlotVariant {
                    replacement_path: format!("./scripts/bytecode/slot{slot_count}.bytecode")
                        .into(),
                    slot_count,
                })
                .collect(),
        }
    }
}

impl RewriteConfig {
    /// Loads a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Checks that at least one variant is configured, the family token is
    /// not empty and every slot count is positive.
    pub fn validate(&self) -> Result<(), Error> {
        if self.configurations.is_empty() {
            return Err(Error::InvalidConfig("no variants configured".to_string()));
        }
        if self.family.is_empty() {
            return Err(Error::InvalidConfig("family token is empty".to_string()));
        }
        if let Some(variant) = self.configurations.iter().find(|v| v.slot_count == 0) {
            return Err(Error::InvalidConfig(format!(
                "slot count of {} must be at least 1",
                variant.replacement_path.display()
            )));
        }
        Ok(())
    }
}

impl FromStr for SlotVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slots, path) = s
            .split_once(':')
            .ok_or_else(|| format!("expected SLOTS:PATH, got {s:?}"))?;
        let slot_count = slots
            .trim()
            .parse()
            .map_err(|e| format!("invalid slot count {slots:?}: {e}"))?;
        if path.is_empty() {
            return Err(format!("missing bytecode path in {s:?}"));
        }
        Ok(Self {
            replacement_path: path.into(),
            slot_count,
        })
    }
}
