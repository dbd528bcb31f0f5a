use std::thread;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::info;

use crate::error::Error;
use crate::events::{UiEvent, UiSender};

pub const DEFAULT_HOTKEY: &str = "ctrl+shift+z";

/// Keeps the OS-level registration alive; dropping the handle releases
/// the combo.
pub struct HotkeyHandle {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl std::fmt::Debug for HotkeyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotkeyHandle")
            .field("hotkey", &self.hotkey)
            .finish_non_exhaustive()
    }
}

impl Drop for HotkeyHandle {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.hotkey);
    }
}

/// Register `combo` system-wide and forward every press onto the UI
/// queue as a show-picker request. No window is created here: the
/// press is handled on whichever thread the OS delivers it to, and
/// only the main thread acts on the queued event.
pub fn register(combo: &str, events: UiSender) -> Result<HotkeyHandle, Error> {
    let hotkey: HotKey = combo
        .trim()
        .parse()
        .map_err(|e| Error::Registration(format!("invalid hotkey '{combo}': {e}")))?;

    let manager = GlobalHotKeyManager::new().map_err(|e| Error::Registration(e.to_string()))?;
    manager
        .register(hotkey)
        .map_err(|e| Error::Registration(format!("could not register '{combo}': {e}")))?;

    let id = hotkey.id();
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if event.id == id && event.state == HotKeyState::Pressed {
                if events.send(UiEvent::ShowPicker).is_err() {
                    break;
                }
            }
        }
    });

    info!(combo, "global hotkey registered");
    Ok(HotkeyHandle { manager, hotkey })
}

/// Like `register`, but falls back to the default combo when the
/// configured one cannot be used.
pub fn register_or_default(combo: &str, events: UiSender) -> Result<HotkeyHandle, Error> {
    match register(combo, events.clone()) {
        Ok(handle) => Ok(handle),
        Err(first) => {
            if combo.trim().eq_ignore_ascii_case(DEFAULT_HOTKEY) {
                return Err(first);
            }
            info!(error = %first, fallback = DEFAULT_HOTKEY, "retrying with default hotkey");
            register(DEFAULT_HOTKEY, events)
        }
    }
}
