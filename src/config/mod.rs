//! Runtime configuration.
//! Provides the immutable settings of a run, log levels and path safety helpers.

pub mod paths;
pub mod types;

pub use paths::path_has_symlink_ancestor;
pub use types::{LogLevel, SeederConfig};

/// Directory holding the writable local config (`local.yaml`).
pub const LOCAL_CONFIG_DIR_DEFAULT: &str = "/var/ces/config";
