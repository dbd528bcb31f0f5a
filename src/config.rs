use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Error;
use crate::models::Config;

const CONFIG_FILE: &str = "config.json";

/// Per-user config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipkeep")
        .join(CONFIG_FILE)
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    /// Load the config, falling back to defaults instead of failing.
    /// A missing file is created with the defaults; an unreadable file
    /// is left on disk untouched and the defaults apply for this run.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            let config = Config::default();
            if let Err(e) = config.save(path) {
                warn!(error = %e, "could not write initial config");
            }
            return config;
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default config");
                Config::default()
            }
        }
    }

    /// Rewrite the whole file. Called after every mutation.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Persistence(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        fs::write(path, raw).map_err(|e| Error::Persistence(e.to_string()))
    }
}
