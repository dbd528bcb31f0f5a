use std::path::PathBuf;

use tracing::{info, warn};

use crate::clipboard::SystemClipboard;
use crate::models::Config;
use crate::monitor::ClipMonitor;

/// The user-facing capture toggle: owns the config it persists and the
/// monitor it starts and stops. Toggling is idempotent with respect to
/// the monitor's run state.
pub struct ActivationGate {
    config: Config,
    config_path: PathBuf,
    monitor: ClipMonitor,
}

impl ActivationGate {
    pub fn new(config: Config, config_path: PathBuf, monitor: ClipMonitor) -> Self {
        Self {
            config,
            config_path,
            monitor,
        }
    }

    /// Start capture at launch when the persisted flag says so.
    pub fn auto_start(&mut self) {
        if self.config.clipboard_active && self.monitor.start(SystemClipboard::new()) {
            info!("clipboard capture resumed from saved state");
        }
    }

    pub fn enable(&mut self) {
        if self.monitor.start(SystemClipboard::new()) {
            info!("clipboard capture enabled");
        }
        self.persist_active(true);
    }

    pub fn disable(&mut self) {
        if self.monitor.stop() {
            info!("clipboard capture disabled");
        }
        self.persist_active(false);
    }

    pub fn is_active(&self) -> bool {
        self.monitor.is_running()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn persist_active(&mut self, active: bool) {
        self.config.clipboard_active = active;
        if let Err(e) = self.config.save(&self.config_path) {
            warn!(error = %e, "config save failed, toggle state not persisted");
        }
    }
}
