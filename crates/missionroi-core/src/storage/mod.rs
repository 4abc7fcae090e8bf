mod config;

pub use config::{
    BudgetConfig, Config, LoggingConfig, PrioritizationConfig, SignalsConfig,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the missionroi data directory, creating it if needed.
///
/// `MISSIONROI_HOME` overrides the location outright. Otherwise it is
/// `~/.config/missionroi[-dev]/`, with `MISSIONROI_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MISSIONROI_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MISSIONROI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("missionroi-dev")
            } else {
                base_dir.join("missionroi")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
