//! Key-value configuration store.
//!
//! The tracker persists its ledger through the [`ConfigStore`] port. Two
//! adapters ship with the crate: [`LocalConfigFile`], a YAML file in the
//! local config directory, and [`MemoryStore`] for tests and embedders.

mod file;
mod memory;

pub use file::{LocalConfigFile, LOCAL_CONFIG_FILE_NAME};
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("key {0} not found")]
    Missing(String),

    #[error("value of key {key} in {path} is not a string")]
    NotAString { path: PathBuf, key: String },
}

/// String-keyed configuration store.
pub trait ConfigStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<String, StoreError>;
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
}
