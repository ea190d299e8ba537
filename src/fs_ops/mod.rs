//! Filesystem operations.
//!
//! The core never calls the OS directly: everything goes through the
//! [`Filesystem`] port so tests and embedders can inject their own adapter.
//! [`OsFilesystem`] is the production adapter.

pub mod copy;
mod helpers;
mod os;
pub mod resolve;
pub mod walk;

pub use copy::{copy_file, DEST_DIR_MODE};
pub use helpers::io_error_with_help;
pub use os::OsFilesystem;
pub use resolve::{resolve_mount, ResolvedSource, DATA_SYMLINK_NAME, RESERVED_PREFIX};
pub use walk::{CopyTask, TreeWalker, WalkMode};

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::platform::FileId;

/// Coarse file type as reported by stat/lstat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Dir,
    Symlink,
    /// Devices, sockets, fifos.
    Other,
}

/// The parts of a stat result the core looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub kind: FileKind,
    /// None when the platform exposes no identity; such files never compare equal.
    pub id: Option<FileId>,
}

impl FileInfo {
    pub fn is_regular(&self) -> bool {
        self.kind == FileKind::Regular
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// One entry reported by [`Filesystem::walk_dir`]. Symlinks are not followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    /// 0 for the walk root.
    pub depth: usize,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }
}

/// A failure reported for a single walk entry.
#[derive(Debug)]
pub struct WalkError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// Visitor answer for a walk entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    Continue,
    /// Do not descend into this directory. Ignored for non-directories.
    SkipDir,
}

/// Filesystem capability consumed by the seeding core.
pub trait Filesystem {
    type File: Read + Write;

    /// Stat without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileInfo>;
    /// Resolve every symlink in `path`.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
    fn metadata(&self, path: &Path) -> io::Result<FileInfo>;
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
    fn open(&self, path: &Path) -> io::Result<Self::File>;
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;
    /// Create or truncate `path` for writing.
    fn create(&self, path: &Path) -> io::Result<Self::File>;
    fn copy(&self, from: &mut Self::File, to: &mut Self::File) -> io::Result<u64>;
    /// Flush `file` to stable storage.
    fn sync(&self, file: &mut Self::File) -> io::Result<()>;
    fn close(&self, file: Self::File) -> io::Result<()>;
    fn same_file(&self, a: &FileInfo, b: &FileInfo) -> bool;
    /// Depth-first walk in lexical order starting with `root` itself.
    fn walk_dir(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>) -> WalkControl,
    ) -> io::Result<()>;
    /// Remove a file; a missing path is not an error.
    fn delete_file(&self, path: &Path) -> io::Result<()>;
}
