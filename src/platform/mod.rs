//! Platform-specific helpers.
//! This module hides OS differences (Unix/other) behind a uniform API so the
//! filesystem adapter and the store remain platform-agnostic.

mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

pub use temp::tmp_sibling_name;

#[cfg(unix)]
pub use unix::{
    atomic_write_0600, close_file, create_dir_all_mode, file_id, open_log_file_secure_append,
};

#[cfg(not(unix))]
pub use windows::{
    atomic_write_0600, close_file, create_dir_all_mode, file_id, open_log_file_secure_append,
};

/// Identity of an on-disk object: two paths with equal ids are the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub dev: u64,
    pub ino: u64,
}
