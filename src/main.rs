use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clipkeep::events::{ui_channel, UiEvent};
use clipkeep::{
    config, hotkey, picker, ActivationGate, ClipMonitor, ClipStore, Config, HistoryDb, HistoryLog,
    StoreBackend,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = config::default_config_path();
    let config = Config::load_or_default(&config_path);
    info!(backend = ?config.backend, config = %config_path.display(), "starting clipkeep");

    // Losing the database costs search, not capture: degrade to the
    // file-backed log rather than exiting.
    let store: Arc<dyn ClipStore> = match config.backend {
        StoreBackend::Log => Arc::new(HistoryLog::new(&config.save_path)),
        StoreBackend::Indexed => match HistoryDb::open_default() {
            Ok(db) => Arc::new(db),
            Err(e) => {
                warn!(error = %e, "history database unavailable, falling back to file log");
                Arc::new(HistoryLog::new(&config.save_path))
            }
        },
    };
    let monitor = ClipMonitor::new(Arc::clone(&store), config.poll_interval());
    let (tx, rx) = ui_channel();

    let hotkey_combo = config.hotkey.clone();
    let mut gate = ActivationGate::new(config, config_path, monitor);
    gate.auto_start();

    let _hotkey = match hotkey::register_or_default(&hotkey_combo, tx.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "running without a global hotkey");
            None
        }
    };

    // The main thread owns the picker surface; everything else only
    // posts onto the queue. `tx` stays alive here so the loop keeps
    // blocking even when no hotkey could be registered.
    while let Ok(event) = rx.recv() {
        match event {
            UiEvent::ShowPicker => show_picker(store.as_ref()),
        }
    }

    Ok(())
}

/// Minimal stand-in for the popup: list the current rows. A graphical
/// picker attaches here via `picker::refresh` and `picker::select`.
fn show_picker(store: &dyn ClipStore) {
    match picker::refresh(store, "") {
        Ok(items) => {
            info!(count = items.len(), "picker opened");
            for item in &items {
                println!("{:>4}  {}", item.id, item.label);
            }
        }
        Err(e) => warn!(error = %e, "history query failed"),
    }
}
