//! Ledger of seeded destination files.
//!
//! Every destination written by a run is recorded under one key of the local
//! config as a YAML sequence. The next run deletes everything listed there
//! before seeding again, so files removed from a ConfigMap disappear from the
//! destination too. Nothing is cached: each call round-trips through the store.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{ErrorList, SeederError};
use crate::fs_ops::{io_error_with_help, Filesystem};
use crate::store::ConfigStore;

/// Local config key holding the ledger.
pub const ADDITIONAL_MOUNTS_KEY: &str = "additionalMounts";

/// Records seeded files and purges them again.
pub trait FileTracker {
    /// Add `path` to the ledger unless it is already listed.
    fn add_file(&self, path: &Path) -> Result<(), SeederError>;
    /// Delete every listed file, then clear the ledger.
    fn delete_all_tracked_files(&self) -> Result<(), SeederError>;
}

/// What happens to the ledger when some tracked files could not be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerResetPolicy {
    /// Clear the ledger regardless; undeleted files are reported and forgotten.
    #[default]
    Always,
    /// Leave the ledger untouched so the next run retries the deletions.
    RetainOnFailure,
}

/// [`FileTracker`] persisting its ledger in a [`ConfigStore`].
pub struct LocalConfigFileTracker<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    fs: &'a F,
    policy: LedgerResetPolicy,
}

impl<'a, S, F> LocalConfigFileTracker<'a, S, F>
where
    S: ConfigStore + ?Sized,
    F: Filesystem + ?Sized,
{
    pub fn new(store: &'a S, fs: &'a F) -> Self {
        Self { store, fs, policy: LedgerResetPolicy::default() }
    }

    pub fn with_policy(mut self, policy: LedgerResetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current ledger; empty when the key is absent or blank.
    pub fn tracked_files(&self) -> Result<Vec<PathBuf>, SeederError> {
        Ok(self.read_ledger()?.unwrap_or_default().into_iter().map(PathBuf::from).collect())
    }

    fn read_ledger(&self) -> Result<Option<Vec<String>>, SeederError> {
        let exists = self
            .store
            .exists(ADDITIONAL_MOUNTS_KEY)
            .map_err(|source| store_error("check", source))?;
        if !exists {
            return Ok(None);
        }
        let raw = self
            .store
            .get(ADDITIONAL_MOUNTS_KEY)
            .map_err(|source| store_error("get", source))?;
        if raw.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }
        serde_yaml::from_str(&raw)
            .map(Some)
            .map_err(|source| SeederError::LedgerFormat { key: ADDITIONAL_MOUNTS_KEY.to_string(), source })
    }

    fn write_ledger(&self, paths: &[String]) -> Result<(), SeederError> {
        let value = serde_yaml::to_string(paths)
            .map_err(|source| SeederError::LedgerFormat { key: ADDITIONAL_MOUNTS_KEY.to_string(), source })?;
        self.store
            .set(ADDITIONAL_MOUNTS_KEY, &value)
            .map_err(|source| store_error("set", source))
    }
}

fn store_error(op: &'static str, source: crate::store::StoreError) -> SeederError {
    SeederError::Store { op, key: ADDITIONAL_MOUNTS_KEY.to_string(), source }
}

impl<S, F> FileTracker for LocalConfigFileTracker<'_, S, F>
where
    S: ConfigStore + ?Sized,
    F: Filesystem + ?Sized,
{
    fn add_file(&self, path: &Path) -> Result<(), SeederError> {
        let entry = path
            .to_str()
            .ok_or_else(|| SeederError::NonUtf8Path(path.to_path_buf()))?
            .to_string();
        let mut paths = self.read_ledger()?.unwrap_or_default();
        if paths.contains(&entry) {
            debug!(path = %entry, "File already tracked");
        } else {
            paths.push(entry);
        }
        self.write_ledger(&paths)
    }

    fn delete_all_tracked_files(&self) -> Result<(), SeederError> {
        let Some(paths) = self.read_ledger()? else {
            debug!(key = ADDITIONAL_MOUNTS_KEY, "No tracked files");
            return Ok(());
        };

        let mut errors = ErrorList::new();
        for p in &paths {
            let path = Path::new(p);
            errors.record(
                self.fs
                    .delete_file(path)
                    .map_err(io_error_with_help("failed to delete tracked file", path)),
            );
        }
        info!(count = paths.len(), failed = errors.len(), "Deleted tracked files");

        if !errors.is_empty() && self.policy == LedgerResetPolicy::RetainOnFailure {
            warn!(key = ADDITIONAL_MOUNTS_KEY, "Keeping ledger because some deletions failed");
            return errors.into_result();
        }
        errors.record(self.write_ledger(&[]));
        errors.into_result()
    }
}
