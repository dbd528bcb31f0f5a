use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::error::Error;
use crate::models::ClipRecord;
use crate::store::ClipStore;

/// In-memory entries kept; the file underneath grows unbounded.
pub const HISTORY_CAP: usize = 20;

const LOG_FILE_NAME: &str = "clipboard_history.txt";
const SEPARATOR: &str = "------------------------------";

/// Log-variant store: a bounded ring of the most recent clips,
/// mirrored best-effort to an append-only text file for audit. The
/// ring and the file are not required to agree in length.
pub struct HistoryLog {
    entries: Mutex<VecDeque<ClipRecord>>,
    dir: PathBuf,
}

impl HistoryLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(HISTORY_CAP)),
            dir: dir.into(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE_NAME)
    }

    fn write_block(&self, content: &str, stamp: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.log_path())?;
        write!(file, "[{stamp}]\n{content}\n{SEPARATOR}\n")
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, VecDeque<ClipRecord>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ClipStore for HistoryLog {
    fn append(&self, content: &str) -> Result<(), Error> {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        {
            let mut entries = self.lock_entries();
            entries.push_back(ClipRecord {
                id: 0,
                content: content.to_string(),
                created_at: stamp.clone(),
            });
            if entries.len() > HISTORY_CAP {
                entries.pop_front();
            }
        }
        // The in-memory entry above is already safe; the file mirror is
        // best-effort and must never take the monitor down with it.
        if let Err(e) = self.write_block(content, &stamp) {
            warn!(error = %e, path = %self.log_path().display(), "history file append failed");
        }
        Ok(())
    }

    /// Newest first. This variant has no search; `filter` is ignored.
    fn recent(&self, _filter: &str) -> Result<Vec<ClipRecord>, Error> {
        Ok(self.lock_entries().iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_memory_at_twenty_evicting_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());

        for i in 0..25 {
            log.append(&format!("clip {i}")).unwrap();
        }

        let recent = log.recent("").unwrap();
        assert_eq!(recent.len(), HISTORY_CAP);
        // Newest first; clips 0..5 evicted.
        assert_eq!(recent[0].content, "clip 24");
        assert_eq!(recent[19].content, "clip 5");
    }

    #[test]
    fn file_mirror_uses_block_format() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());

        log.append("hello\nworld").unwrap();
        log.append("second").unwrap();

        let raw = fs::read_to_string(log.log_path()).unwrap();
        let blocks: Vec<&str> = raw.split(&format!("{SEPARATOR}\n")).collect();
        assert_eq!(blocks.len(), 3, "two blocks plus trailing empty split");
        assert!(blocks[0].starts_with('['));
        assert!(blocks[0].contains("]\nhello\nworld\n"));
        assert!(blocks[1].contains("]\nsecond\n"));
    }

    #[test]
    fn file_keeps_growing_past_memory_cap() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());

        for i in 0..25 {
            log.append(&format!("clip {i}")).unwrap();
        }

        let raw = fs::read_to_string(log.log_path()).unwrap();
        assert_eq!(raw.matches(SEPARATOR).count(), 25);
        assert!(raw.contains("clip 0"), "evicted entries stay in the file");
    }

    #[test]
    fn unwritable_directory_keeps_memory_entries() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the directory should be makes every
        // create_dir_all/open fail.
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "occupied").unwrap();

        let log = HistoryLog::new(&blocked);
        for i in 0..25 {
            log.append(&format!("clip {i}")).unwrap();
        }

        let recent = log.recent("").unwrap();
        assert_eq!(recent.len(), HISTORY_CAP, "eviction works without the file");
        assert_eq!(recent[0].content, "clip 24");
        assert_eq!(recent[19].content, "clip 5");
    }

    #[test]
    fn filter_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path());
        log.append("alpha").unwrap();
        log.append("beta").unwrap();

        assert_eq!(log.recent("alpha").unwrap().len(), 2);
    }
}
