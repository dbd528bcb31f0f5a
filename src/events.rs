use std::sync::mpsc::{channel, Receiver, Sender};

/// Requests posted to the UI thread's queue. Background threads (the
/// hotkey listener in particular) only ever send; window construction
/// happens on the draining side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    ShowPicker,
}

pub type UiSender = Sender<UiEvent>;
pub type UiReceiver = Receiver<UiEvent>;

pub fn ui_channel() -> (UiSender, UiReceiver) {
    channel()
}
