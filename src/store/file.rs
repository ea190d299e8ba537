//! YAML-file backed store.
//!
//! The file is a YAML mapping shared with other tools; this store only owns
//! the keys it is asked to write:
//!   additionalMounts: |
//!     - /etc/app/db.conf
//! Every other entry, nested maps and typed scalars included, is written back
//! untouched. Every call re-reads the file; writes go through a temp sibling
//! and a rename so a crash never leaves a half-written file behind.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ConfigStore, StoreError};
use crate::platform::atomic_write_0600;

pub const LOCAL_CONFIG_FILE_NAME: &str = "local.yaml";

#[derive(Debug, Clone)]
pub struct LocalConfigFile {
    path: PathBuf,
}

impl LocalConfigFile {
    /// Store living in `<dir>/local.yaml`.
    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join(LOCAL_CONFIG_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Mapping, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Mapping::new()),
            Err(source) => return Err(StoreError::Io { path: self.path.clone(), source }),
        };
        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }
        // A document holding only comments or `~` parses as null.
        serde_yaml::from_str::<Option<Mapping>>(&content)
            .map(Option::unwrap_or_default)
            .map_err(|source| StoreError::Format { path: self.path.clone(), source })
    }

    fn save(&self, entries: &Mapping) -> Result<(), StoreError> {
        let out = serde_yaml::to_string(entries)
            .map_err(|source| StoreError::Format { path: self.path.clone(), source })?;
        atomic_write_0600(&self.path, out.as_bytes())
            .map_err(|source| StoreError::Io { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), "Wrote local config");
        Ok(())
    }
}

impl ConfigStore for LocalConfigFile {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(Value::String(key.to_string()), Value::String(value.to_string()));
        self.save(&entries)
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        match self.load()?.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(StoreError::NotAString { path: self.path.clone(), key: key.to_string() }),
            None => Err(StoreError::Missing(key.to_string())),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.load()?.contains_key(key))
    }
}
