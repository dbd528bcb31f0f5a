use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One captured unit of clipboard text. `id` is the row id in the
/// indexed store and 0 for records that never went through it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub id: i64,
    pub content: String,
    pub created_at: String,
}

/// Which history store the daemon wires in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Bounded in-memory ring mirrored to an append-only text log.
    Log,
    /// SQLite relation with substring search.
    Indexed,
}

impl StoreBackend {
    /// Poll period used when the config does not override it.
    pub fn default_poll_interval(self) -> Duration {
        match self {
            StoreBackend::Log => Duration::from_millis(1000),
            StoreBackend::Indexed => Duration::from_millis(500),
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Indexed
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the log variant writes its history file into.
    pub save_path: PathBuf,
    /// Global shortcut that opens the picker, e.g. "ctrl+shift+z".
    pub hotkey: String,
    /// Persisted capture toggle; capture auto-starts when true.
    pub clipboard_active: bool,
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Optional poll period override in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_path: dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")),
            hotkey: crate::hotkey::DEFAULT_HOTKEY.to_string(),
            clipboard_active: false,
            backend: StoreBackend::Indexed,
            poll_interval_ms: None,
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.backend.default_poll_interval())
    }
}
