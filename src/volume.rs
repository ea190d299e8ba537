//! Copying volume mounts into their destinations.
//!
//! Each source directory is walked up to twice:
//!  1. when it is a projected volume (`..data` symlink present), the rotated
//!     directory behind the symlink is copied flat into the destination;
//!  2. the mount root itself is always walked for subPath-mounted files,
//!     keeping their relative paths and skipping the projection bookkeeping.
//!
//! Mount pairs are processed in order and independently; errors are collected
//! and returned together once every pair has been handled.

use std::path::PathBuf;
use tracing::{error, info};

use crate::errors::{ErrorList, SeederError};
use crate::fs_ops::{resolve_mount, Filesystem, TreeWalker, WalkMode};
use crate::tracker::FileTracker;

/// A source directory and where its files should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl MountSpec {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self { source: source.into(), destination: destination.into() }
    }
}

pub struct VolumeMountCopier<'a, F: ?Sized, T: ?Sized> {
    fs: &'a F,
    tracker: &'a T,
}

impl<'a, F, T> VolumeMountCopier<'a, F, T>
where
    F: Filesystem + ?Sized,
    T: FileTracker + ?Sized,
{
    pub fn new(fs: &'a F, tracker: &'a T) -> Self {
        Self { fs, tracker }
    }

    /// Copy all regular files of every mount into its destination.
    ///
    /// Existing destination files are overwritten. A mount whose data symlink
    /// cannot be resolved is skipped entirely; the remaining mounts still run.
    pub fn copy_volume_mount(&self, mounts: &[MountSpec]) -> Result<(), SeederError> {
        let mut errors = ErrorList::new();
        for mount in mounts {
            errors.record(self.copy_mount(mount));
        }
        errors.into_result()
    }

    fn copy_mount(&self, mount: &MountSpec) -> Result<(), SeederError> {
        let (src, dest) = (mount.source.as_path(), mount.destination.as_path());
        info!(src = %src.display(), dest = %dest.display(), "Start copy files");

        let resolved = resolve_mount(self.fs, src).inspect_err(|e| {
            error!(code = e.code(), src = %src.display(), error = %e, "Skipping mount");
        })?;

        let walker = TreeWalker::new(self.fs, self.tracker);
        let mut errors = ErrorList::new();
        let projected = !resolved.is_sub_path_mount;
        if projected {
            errors.record(walker.walk_dir(&resolved.real_path, dest, WalkMode::Flatten));
        }
        errors.record(walker.walk_dir(src, dest, WalkMode::SubPath { projected }));

        if !errors.is_empty() {
            error!(src = %src.display(), failed = errors.len(), "Mount copied with errors");
        }
        errors.into_result()
    }
}
