//! Core library for `data_seeder`.
//!
//! Reproduces Kubernetes ConfigMap/Secret volume semantics on a plain
//! filesystem: each mounted source directory is classified (projected volume
//! with a `..data` symlink, or subPath bind mount), its regular files are
//! copied into a destination directory, and every written destination is
//! recorded in a ledger so the next run can purge them before reseeding.
//!
//! The core talks to the filesystem and to the config store only through the
//! [`Filesystem`] and [`ConfigStore`] ports.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod store;
pub mod tracker;
pub mod volume;

pub use config::{LogLevel, SeederConfig};
pub use errors::{ErrorList, SeederError};
pub use fs_ops::{Filesystem, OsFilesystem};
pub use store::{ConfigStore, LocalConfigFile, MemoryStore};
pub use tracker::{FileTracker, LedgerResetPolicy, LocalConfigFileTracker, ADDITIONAL_MOUNTS_KEY};
pub use volume::{MountSpec, VolumeMountCopier};

use tracing::info;

/// Purge the files seeded by the previous run, then seed `mounts`.
///
/// A failing purge aborts before anything is copied. An empty `mounts` list
/// only purges.
pub fn reseed<F, S>(
    fs: &F,
    store: &S,
    mounts: &[MountSpec],
    policy: LedgerResetPolicy,
) -> Result<(), SeederError>
where
    F: Filesystem + ?Sized,
    S: ConfigStore + ?Sized,
{
    let tracker = LocalConfigFileTracker::new(store, fs).with_policy(policy);

    info!("Delete old tracked files");
    tracker.delete_all_tracked_files()?;

    if mounts.is_empty() {
        info!("No source and target paths given");
        return Ok(());
    }
    VolumeMountCopier::new(fs, &tracker).copy_volume_mount(mounts)
}
