use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::{debug, warn};

use crate::error::Error;

const PASTE_KEY_STEP_MS: u64 = 2;

/// Read side of the OS clipboard, as the monitor sees it.
pub trait ClipSource {
    /// Current clipboard text. `None` covers both "nothing textual on
    /// the clipboard" and a transient read failure; either way the
    /// caller skips the tick and tries again next time.
    fn read(&mut self) -> Option<String>;
}

/// arboard-backed source. A fresh handle is opened per operation so no
/// OS clipboard resource is held between ticks.
#[derive(Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        SystemClipboard
    }
}

impl ClipSource for SystemClipboard {
    fn read(&mut self) -> Option<String> {
        let mut clipboard = match Clipboard::new() {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "clipboard unavailable this tick");
                return None;
            }
        };
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(error = %e, "clipboard read failed");
                None
            }
        }
    }
}

/// Write a clip back onto the system clipboard.
pub fn set_clipboard_text(text: &str) -> Result<(), Error> {
    let mut clipboard = Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| Error::Clipboard(e.to_string()))
}

/// Simulate the platform paste shortcut into the focused window.
/// Best-effort: failures are logged, never surfaced. The settle delay
/// gives the window manager time to move focus back to the target
/// application after the picker is dismissed.
pub fn send_paste_shortcut(focus_settle_ms: u64) {
    if focus_settle_ms > 0 {
        thread::sleep(Duration::from_millis(focus_settle_ms));
    }

    let mut enigo = match Enigo::new(&Settings::default()) {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "keystroke injection unavailable");
            return;
        }
    };

    if let Err(e) = press_paste_chord(&mut enigo) {
        warn!(error = %e, "paste keystroke failed");
    }
}

fn press_paste_chord(enigo: &mut Enigo) -> enigo::InputResult<()> {
    #[cfg(target_os = "macos")]
    let modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let modifier = Key::Control;

    enigo.key(modifier, Direction::Press)?;
    thread::sleep(Duration::from_millis(PASTE_KEY_STEP_MS));
    enigo.key(Key::Unicode('v'), Direction::Click)?;
    thread::sleep(Duration::from_millis(PASTE_KEY_STEP_MS));
    enigo.key(modifier, Direction::Release)
}
