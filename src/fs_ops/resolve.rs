//! Classifying a volume mount.
//!
//! A projected ConfigMap/Secret volume keeps its files in a timestamped
//! directory (`..2024_01_01_12_00_00.123`) and exposes the current one through
//! the `..data` symlink, which the kubelet repoints atomically on update.
//! The published directory is immutable, so walking through the symlink's
//! current target yields a consistent snapshot. A subPath mount has no such
//! symlink; its files sit directly under the mount root.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Filesystem;
use crate::errors::SeederError;

/// Name of the symlink maintained by projected volumes.
pub const DATA_SYMLINK_NAME: &str = "..data";
/// Prefix of every bookkeeping entry of the rotation mechanism.
pub const RESERVED_PREFIX: &str = "..";

/// Where the files of a mount really live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub real_path: PathBuf,
    pub is_sub_path_mount: bool,
}

/// Detect the mount mode of `source`.
///
/// A missing or unreadable `..data` entry means subPath mount and is not an
/// error; a `..data` symlink that cannot be evaluated, or that does not lead
/// to a directory, is.
pub fn resolve_mount<F: Filesystem + ?Sized>(fs: &F, source: &Path) -> Result<ResolvedSource, SeederError> {
    let data = source.join(DATA_SYMLINK_NAME);
    debug!(path = %data.display(), "Checking data symlink");

    match fs.symlink_metadata(&data) {
        Ok(info) if info.is_symlink() => {
            let real_path = resolve_data_symlink(fs, &data)?;
            info!(link = %data.display(), target = %real_path.display(), "Detected data symlink");
            Ok(ResolvedSource { real_path, is_sub_path_mount: false })
        }
        _ => Ok(ResolvedSource { real_path: source.to_path_buf(), is_sub_path_mount: true }),
    }
}

fn resolve_data_symlink<F: Filesystem + ?Sized>(fs: &F, link: &Path) -> Result<PathBuf, SeederError> {
    let unresolvable = |source| SeederError::DataLinkUnresolvable { link: link.to_path_buf(), source };

    let target = fs.canonicalize(link).map_err(unresolvable)?;
    let info = fs.metadata(&target).map_err(unresolvable)?;
    if !info.is_dir() {
        return Err(SeederError::DataLinkNotDirectory { link: link.to_path_buf(), target });
    }
    Ok(target)
}
