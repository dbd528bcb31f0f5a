pub mod activation;
pub mod clipboard;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod history;
pub mod hotkey;
pub mod models;
pub mod monitor;
pub mod picker;
pub mod store;

pub use activation::ActivationGate;
pub use clipboard::{ClipSource, SystemClipboard};
pub use database::HistoryDb;
pub use error::Error;
pub use events::UiEvent;
pub use history::HistoryLog;
pub use models::{ClipRecord, Config, StoreBackend};
pub use monitor::ClipMonitor;
pub use store::ClipStore;
