//! I/O error helpers.
//!
//! Enrich io::Error with the failed operation, the path and a short hint
//! derived from the OS error code.
//!
//! Usage:
//!   fs.open(src).map_err(io_error_with_help("failed to open file", src))?;

use std::io;
use std::path::Path;

use crate::errors::SeederError;

/// Short hint for common OS failure codes; empty when nothing useful applies.
fn hint(e: &io::Error) -> &'static str {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        return match code {
            libc::EACCES | libc::EPERM => " (permission denied; check ownership and modes)",
            libc::ENOENT => " (path not found)",
            libc::ENOSPC => " (no space left on device)",
            libc::EROFS => " (read-only filesystem)",
            libc::ELOOP => " (too many levels of symbolic links)",
            libc::ENAMETOOLONG => " (file name too long)",
            libc::EMFILE | libc::ENFILE => " (too many open files)",
            _ => "",
        };
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => " (permission denied; check ownership and modes)",
        io::ErrorKind::NotFound => " (path not found)",
        _ => "",
    }
}

pub(crate) fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    format!("{} {}: {}{}", op, path.display(), e, hint(e))
}

/// Closure for `.map_err(...)` converting io::Error -> SeederError::Io.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> SeederError + 'a {
    move |e: io::Error| SeederError::Io {
        message: build_message(op, path, &e),
        path: path.to_path_buf(),
        source: e,
    }
}
