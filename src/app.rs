//! Application orchestrator.
//! Validates the mount pairs, initializes logging, opens the local config and
//! runs the purge + seed cycle.

use anyhow::{anyhow, Result};
use tracing::{debug, error, info};

use data_seeder::cli::{Cli, Command, CopyArgs};
use data_seeder::output as out;
use data_seeder::{reseed, LocalConfigFile, OsFilesystem};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Copy(args) => run_copy(args),
    }
}

fn run_copy(args: CopyArgs) -> Result<()> {
    // Fail on mismatched pairs before any filesystem or store access.
    let mounts = args.mounts()?;
    let cfg = args.to_config();

    if let Some(raw) = args.log_level.as_deref()
        && args.effective_log_level().is_none()
    {
        out::print_warn(&format!("Unknown log level '{raw}', using '{}'", cfg.log_level));
    }

    // Hold the guard until the end of the run so file logs are flushed.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json)
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;
    debug!(?cfg, mounts = mounts.len(), "Starting data_seeder copy");

    let store = LocalConfigFile::in_dir(&cfg.local_config_dir);
    match reseed(&OsFilesystem, &store, &mounts, cfg.reset_policy) {
        Ok(()) => {
            info!(mounts = mounts.len(), "Seeding completed");
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), config = %store.path().display(), "Seeding failed");
            Err(e.into())
        }
    }
}
