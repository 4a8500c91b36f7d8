mod config;
pub mod database;
pub mod migrations;

pub use config::{AuthConfig, Config, HistoryConfig, NotifyConfig, ServerConfig};
pub use database::{CalculationRecord, Database};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/valuenum[-dev]/` based on VALUENUM_ENV.
///
/// Set VALUENUM_ENV=dev to use the development data directory, or
/// VALUENUM_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("VALUENUM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("VALUENUM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("valuenum-dev")
            } else {
                base_dir.join("valuenum")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
