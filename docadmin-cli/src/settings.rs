//! Engine settings loaded from `config.json`.

use std::fs;
use std::io;
use std::path::Path;

use docadmin_lib::EngineConfig;
use docadmin_lib::error::ConfigError;
use log::{info, warn};
use thiserror::Error;

use crate::paths;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Read a config file. A missing file yields `Ok(None)`.
pub fn read_config(path: &Path) -> Result<Option<EngineConfig>, SettingsError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };
    Ok(Some(EngineConfig::from_json_str(&json)?))
}

/// Load the engine configuration from the platform config directory.
///
/// Falls back to defaults when the file is missing or invalid.
pub fn load() -> EngineConfig {
    let Some(path) = paths::config_file() else {
        warn!("No config directory available, using defaults");
        return EngineConfig::default();
    };

    match read_config(&path) {
        Ok(Some(config)) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Ok(None) => EngineConfig::default(),
        Err(e) => {
            warn!("Ignoring config: {e}");
            EngineConfig::default()
        }
    }
}
