use crate::clipboard::{send_paste_shortcut, set_clipboard_text};
use crate::error::Error;
use crate::models::ClipRecord;
use crate::store::ClipStore;

/// Visible characters of a label before it is cut off.
pub const DISPLAY_CAP: usize = 45;

const ELLIPSIS: char = '…';
const PASTE_SETTLE_MS: u64 = 100;

/// One row of the picker list: the full content for the write-back
/// path plus a single-line label for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct PickerItem {
    pub id: i64,
    pub label: String,
    pub content: String,
    pub created_at: String,
}

impl From<ClipRecord> for PickerItem {
    fn from(record: ClipRecord) -> Self {
        Self {
            id: record.id,
            label: display_label(&record.content),
            content: record.content,
            created_at: record.created_at,
        }
    }
}

/// Display-ready rows for the popup, newest first, narrowed by
/// `filter` where the store supports search.
pub fn refresh(store: &dyn ClipStore, filter: &str) -> Result<Vec<PickerItem>, Error> {
    Ok(store
        .recent(filter)?
        .into_iter()
        .map(PickerItem::from)
        .collect())
}

/// Copy the selected clip's full content back onto the system
/// clipboard. With `paste` set, follow up with a paste keystroke once
/// focus has had time to settle back on the target application. The
/// caller dismisses the picker surface.
pub fn select(item: &PickerItem, paste: bool) -> Result<(), Error> {
    set_clipboard_text(&item.content)?;
    if paste {
        send_paste_shortcut(PASTE_SETTLE_MS);
    }
    Ok(())
}

/// Single-line rendering of a clip: newline runs collapse to one
/// space, and anything past 45 visible characters is replaced by an
/// ellipsis. Display-only; stored content is never touched.
pub fn display_label(content: &str) -> String {
    let mut flat = String::with_capacity(content.len());
    for c in content.chars() {
        if c == '\n' || c == '\r' {
            if !flat.ends_with(' ') {
                flat.push(' ');
            }
        } else {
            flat.push(c);
        }
    }

    let mut label: String = flat.chars().take(DISPLAY_CAP).collect();
    if flat.chars().count() > DISPLAY_CAP {
        label.push(ELLIPSIS);
    }
    label
}
