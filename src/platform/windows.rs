//! Non-Unix implementations of platform helpers (best-effort).
//!
//! Notes:
//! - POSIX modes do not apply; directories are created with default ACLs.
//! - std exposes no stable file identity here, so `file_id` is None and the
//!   same-file check never matches.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::temp::tmp_sibling_name;
use super::FileId;

/// Open log file for appending (no symlink defense available via std).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Write via temp sibling + fsync + rename.
pub fn atomic_write_0600(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    fs::create_dir_all(parent)?;
    let tmp = tmp_sibling_name(path);
    let write_tmp = || -> io::Result<()> {
        let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()
    };
    if let Err(e) = write_tmp().and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Dropping the handle closes it; close errors are not observable via std.
pub fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

pub fn create_dir_all_mode(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

pub fn file_id(_meta: &Metadata) -> Option<FileId> {
    None
}
