//! Single-file copy used to seed a destination.
//! - Overwrites an existing destination (create/truncate)
//! - Creates missing parent directories with owner/group-only modes
//! - Syncs the destination before reporting success
//! - Closes both handles on every path; close failures are only logged

use std::io;
use std::path::Path;
use tracing::{info, warn};

use super::helpers::io_error_with_help;
use super::Filesystem;
use crate::errors::SeederError;

/// Mode for destination directories created on demand.
pub const DEST_DIR_MODE: u32 = 0o770;

/// Copy `src` to `dest`, returning the number of bytes written.
pub fn copy_file<F: Filesystem + ?Sized>(fs: &F, src: &Path, dest: &Path) -> Result<u64, SeederError> {
    let mut from = fs.open(src).map_err(io_error_with_help("failed to open file", src))?;
    let result = write_destination(fs, &mut from, src, dest);
    log_close(fs.close(from), src);

    let bytes = result?;
    info!(src = %src.display(), dest = %dest.display(), bytes, "Copied file");
    Ok(bytes)
}

fn write_destination<F: Filesystem + ?Sized>(
    fs: &F,
    from: &mut F::File,
    src: &Path,
    dest: &Path,
) -> Result<u64, SeederError> {
    if let Some(parent) = dest.parent() {
        fs.create_dir_all(parent, DEST_DIR_MODE)
            .map_err(io_error_with_help("failed to create dirs for path", dest))?;
    }

    let mut to = fs.create(dest).map_err(io_error_with_help("failed to open file", dest))?;
    let result = fs
        .copy(from, &mut to)
        .map_err(|source| SeederError::CopyStream {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source,
        })
        .and_then(|bytes| {
            fs.sync(&mut to)
                .map_err(io_error_with_help("failed to flush buffer to file", dest))?;
            Ok(bytes)
        });
    log_close(fs.close(to), dest);
    result
}

fn log_close(res: io::Result<()>, path: &Path) {
    if let Err(e) = res {
        warn!(path = %path.display(), error = %e, "failed to close file");
    }
}
