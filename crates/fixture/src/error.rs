use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or manipulating a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Storage key is not a hex encoded 256-bit integer.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidStorageKey {
        /// Key as found in the fixture.
        key: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Adding a slot offset to a storage key left the 256-bit range.
    #[error("storage key {key} + {offset} overflows 256 bits")]
    StorageKeyOverflow {
        /// Base key as found in the fixture.
        key: String,
        /// Offset that was added.
        offset: u64,
    },
    /// The fixture has no test units.
    #[error("fixture contains no test units")]
    Empty,
    /// The requested test unit is not present.
    #[error("test unit {name:?} not found, available: {available:?}")]
    UnknownUnit {
        /// Requested name.
        name: String,
        /// Names present in the fixture.
        available: Vec<String>,
    },
    /// Reading the fixture failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Fixture path.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// Fixture is not valid JSON or does not match the model.
    #[error(transparent)]
    SerdeDeserialize(#[from] serde_json::Error),
}
