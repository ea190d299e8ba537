//! CLI definition and parsing.
//! Defines the `copy` subcommand and turns its flags into mount pairs and a
//! `SeederConfig`.
//!
//! Notes:
//! - `--source` and `--target` repeat and pair up by position.
//! - --debug is a shorthand for --log-level debug.

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::{LogLevel, SeederConfig, LOCAL_CONFIG_DIR_DEFAULT};
use crate::errors::SeederError;
use crate::tracker::LedgerResetPolicy;
use crate::volume::MountSpec;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Seed files from ConfigMap/Secret volume mounts into plain directories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy files from the given volume mounts to their destination paths.
    Copy(CopyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Mounted volume to copy from; repeat for several mounts.
    #[arg(long = "source", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub sources: Vec<PathBuf>,

    /// Destination for the `--source` at the same position.
    #[arg(long = "target", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub targets: Vec<PathBuf>,

    /// Directory of the local config holding the list of seeded files.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath, default_value = LOCAL_CONFIG_DIR_DEFAULT)]
    pub local_config_dir: PathBuf,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Keep the list of seeded files when some of them could not be deleted.
    #[arg(long, help = "Do not clear the seeded-file list if deleting a listed file fails")]
    pub retain_ledger_on_failure: bool,
}

impl CopyArgs {
    /// Pair sources and targets by position; counts must match.
    pub fn mounts(&self) -> Result<Vec<MountSpec>, SeederError> {
        if self.sources.len() != self.targets.len() {
            return Err(SeederError::MountCountMismatch {
                sources: self.sources.len(),
                targets: self.targets.len(),
            });
        }
        Ok(self
            .sources
            .iter()
            .zip(&self.targets)
            .map(|(s, t)| MountSpec::new(s, t))
            .collect())
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Build the run configuration; unset flags keep the defaults.
    pub fn to_config(&self) -> SeederConfig {
        let defaults = SeederConfig::default();
        SeederConfig {
            local_config_dir: self.local_config_dir.clone(),
            log_level: self.effective_log_level().unwrap_or(defaults.log_level),
            log_file: self.log_file.clone(),
            json: self.json,
            reset_policy: if self.retain_ledger_on_failure {
                LedgerResetPolicy::RetainOnFailure
            } else {
                LedgerResetPolicy::Always
            },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
