//! Typed error definitions for data_seeder.
//! Provides the well-known failure modes of a seeding run plus `ErrorList`,
//! which collects recoverable errors so a caller learns about every failed
//! file in one run.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SeederError {
    #[error("failed to resolve data dir symlink {link}: {source}")]
    DataLinkUnresolvable {
        link: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("data symlink {link} should point to a dir but resolves to {target}")]
    DataLinkNotDirectory { link: PathBuf, target: PathBuf },

    #[error("source file {0} is not a regular file")]
    SourceNotRegular(PathBuf),

    #[error("destination file {0} exists and is not a regular file")]
    DestinationNotRegular(PathBuf),

    #[error("{message}")]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy from {src} to {dest}: {source}")]
    CopyStream {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error during directory walk for path {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {op} local config key {key}: {source}")]
    Store {
        op: &'static str,
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("invalid value in local config key {key}: {source}")]
    LedgerFormat {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("path {0} is not valid UTF-8 and cannot be tracked")]
    NonUtf8Path(PathBuf),

    #[error("amount of source and target paths aren't equal ({sources} sources, {targets} targets)")]
    MountCountMismatch { sources: usize, targets: usize },

    #[error("{0}")]
    Multiple(ErrorList),
}

impl SeederError {
    /// Stable short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            SeederError::DataLinkUnresolvable { .. } => "data_link_unresolvable",
            SeederError::DataLinkNotDirectory { .. } => "data_link_not_directory",
            SeederError::SourceNotRegular(_) => "source_not_regular",
            SeederError::DestinationNotRegular(_) => "destination_not_regular",
            SeederError::Io { .. } => "io",
            SeederError::CopyStream { .. } => "copy_stream",
            SeederError::Walk { .. } => "walk",
            SeederError::Store { .. } => "store",
            SeederError::LedgerFormat { .. } => "ledger_format",
            SeederError::NonUtf8Path(_) => "non_utf8_path",
            SeederError::MountCountMismatch { .. } => "mount_count_mismatch",
            SeederError::Multiple(_) => "multiple",
        }
    }

    /// True for failures that make a whole mount pair unusable.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            SeederError::DataLinkUnresolvable { .. } | SeederError::DataLinkNotDirectory { .. }
        )
    }
}

/// Ordered collection of recoverable errors.
///
/// Nested aggregates are flattened on insertion, so the final list reads as
/// one error per line no matter how deep the walk that produced them was.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<SeederError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn push(&mut self, err: SeederError) {
        match err {
            SeederError::Multiple(list) => self.errors.extend(list.errors),
            other => self.errors.push(other),
        }
    }

    /// Record the error of `result`, if any.
    pub fn record<T>(&mut self, result: Result<T, SeederError>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeederError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, the single error when exactly one
    /// was recorded, otherwise `SeederError::Multiple`.
    pub fn into_result(mut self) -> Result<(), SeederError> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(SeederError::Multiple(self)),
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}
