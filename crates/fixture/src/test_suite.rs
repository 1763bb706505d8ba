use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

use crate::{FixtureError, FixtureUnit};

/// A fixture file: test names mapped to units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSuite(pub BTreeMap<String, FixtureUnit>);

impl FixtureSuite {
    /// Reads and parses a fixture file.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// A suite holding a single unit.
    pub fn single(name: impl Into<String>, unit: FixtureUnit) -> Self {
        Self(BTreeMap::from([(name.into(), unit)]))
    }

    /// Selects a unit by name, or the first one in key order when `name` is `None`.
    pub fn unit(&self, name: Option<&str>) -> Result<(&str, &FixtureUnit), FixtureError> {
        match name {
            Some(name) => self
                .0
                .get_key_value(name)
                .map(|(name, unit)| (name.as_str(), unit))
                .ok_or_else(|| FixtureError::UnknownUnit {
                    name: name.to_string(),
                    available: self.0.keys().cloned().collect(),
                }),
            None => self
                .0
                .iter()
                .next()
                .map(|(name, unit)| (name.as_str(), unit))
                .ok_or(FixtureError::Empty),
        }
    }
}
