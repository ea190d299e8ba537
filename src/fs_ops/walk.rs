//! Walking a resolved source tree and seeding every regular file.
//!
//! Per entry:
//! - directories are skipped (pruning is decided by the walk itself)
//! - only regular source files are accepted
//! - a destination that is the same file as the source is left alone
//! - everything else is copied and recorded in the tracker
//!
//! Errors are collected per entry; one bad file never stops its siblings.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::copy::copy_file;
use super::helpers::io_error_with_help;
use super::resolve::{DATA_SYMLINK_NAME, RESERVED_PREFIX};
use super::{Filesystem, WalkControl, WalkEntry};
use crate::errors::{ErrorList, SeederError};
use crate::tracker::FileTracker;

/// How source paths map onto the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Rotated data directory: the destination is `<dest>/<basename>`.
    Flatten,
    /// Mount root: the destination keeps the path relative to the root.
    /// `projected` is set when the same root also carries a data symlink.
    SubPath { projected: bool },
}

impl WalkMode {
    pub fn is_sub_path_mount(self) -> bool {
        matches!(self, WalkMode::SubPath { .. })
    }
}

/// One discovered regular file and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source_path: PathBuf,
    pub relative_name: PathBuf,
    pub destination_path: PathBuf,
}

impl CopyTask {
    /// Derive the destination of `file`, found below `src_root`, under `dest_root`.
    pub fn plan(src_root: &Path, dest_root: &Path, file: &Path, mode: WalkMode) -> Result<Self, SeederError> {
        let relative_name = if mode.is_sub_path_mount() {
            file.strip_prefix(src_root)
                .map(Path::to_path_buf)
                .map_err(|_| SeederError::Io {
                    message: format!(
                        "can't get the relative path of the source file {} and the source volume {}",
                        file.display(),
                        src_root.display()
                    ),
                    path: file.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
                })?
        } else {
            // The rotated directory has no nesting worth preserving.
            file.file_name().map(PathBuf::from).ok_or_else(|| SeederError::Io {
                message: format!("source file {} has no file name", file.display()),
                path: file.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::InvalidInput),
            })?
        };
        Ok(Self {
            source_path: file.to_path_buf(),
            destination_path: dest_root.join(&relative_name),
            relative_name,
        })
    }
}

/// Walks one source tree into one destination tree.
///
/// Source symlinks are per-file errors, with one exception: in the sub-path
/// walk of a projected mount, top-level links of the form
/// `name -> ..data/name` are skipped. The kubelet creates one per key and
/// their content is already seeded by the flattened walk of the data dir.
pub struct TreeWalker<'a, F: ?Sized, T: ?Sized> {
    fs: &'a F,
    tracker: &'a T,
}

impl<'a, F, T> TreeWalker<'a, F, T>
where
    F: Filesystem + ?Sized,
    T: FileTracker + ?Sized,
{
    pub fn new(fs: &'a F, tracker: &'a T) -> Self {
        Self { fs, tracker }
    }

    /// Seed every regular file below `src` into `dest`.
    ///
    /// In sub-path mode every directory below the root whose name starts with
    /// `..` (the rotated directories) is pruned, as is the `..data` link
    /// itself. Other `..`-prefixed files are ordinary content.
    pub fn walk_dir(&self, src: &Path, dest: &Path, mode: WalkMode) -> Result<(), SeederError> {
        let mut errors = ErrorList::new();
        let walked = self.fs.walk_dir(src, &mut |res| {
            let entry = match res {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(SeederError::Walk { path: e.path, source: e.source });
                    return WalkControl::Continue;
                }
            };
            if mode.is_sub_path_mount() && entry.depth > 0 && is_reserved(&entry) {
                debug!(path = %entry.path.display(), "Skipping projected volume bookkeeping entry");
                return if entry.is_dir { WalkControl::SkipDir } else { WalkControl::Continue };
            }
            errors.record(self.visit(src, dest, &entry, mode));
            WalkControl::Continue
        });
        errors.record(walked.map_err(io_error_with_help("failed to walk directory", src)));
        errors.into_result()
    }

    /// Decide copy-vs-skip for a single entry.
    pub fn visit(&self, src: &Path, dest: &Path, entry: &WalkEntry, mode: WalkMode) -> Result<(), SeederError> {
        let path = entry.path.as_path();
        debug!(path = %path.display(), "Processing file");
        if entry.is_dir {
            debug!(path = %path.display(), "Skip dir");
            return Ok(());
        }

        let source_info = self
            .fs
            .symlink_metadata(path)
            .map_err(io_error_with_help("failed to stat file", path))?;
        if !source_info.is_regular() {
            if source_info.is_symlink() && self.is_projection_link(entry, mode) {
                debug!(path = %path.display(), "Skipping projection link into data dir");
                return Ok(());
            }
            return Err(SeederError::SourceNotRegular(path.to_path_buf()));
        }

        let task = CopyTask::plan(src, dest, path, mode)?;
        let target = task.destination_path.as_path();
        if let Ok(dest_info) = self.fs.metadata(target) {
            if !dest_info.is_regular() {
                return Err(SeederError::DestinationNotRegular(target.to_path_buf()));
            }
            if self.fs.same_file(&source_info, &dest_info) {
                info!(src = %path.display(), dest = %target.display(), "Source and destination are the same file");
                return Ok(());
            }
        }

        copy_file(self.fs, path, target)?;
        self.tracker.add_file(target)
    }

    /// Top-level `name -> ..data/name` links of a projected mount.
    fn is_projection_link(&self, entry: &WalkEntry, mode: WalkMode) -> bool {
        if mode != (WalkMode::SubPath { projected: true }) || entry.depth != 1 {
            return false;
        }
        self.fs
            .read_link(&entry.path)
            .map(|target| target.starts_with(DATA_SYMLINK_NAME))
            .unwrap_or(false)
    }
}

fn is_reserved(entry: &WalkEntry) -> bool {
    let name = entry.file_name();
    if entry.is_dir {
        name.to_string_lossy().starts_with(RESERVED_PREFIX)
    } else {
        name == DATA_SYMLINK_NAME
    }
}
