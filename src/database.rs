use std::fs;
use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::error::Error;
use crate::models::ClipRecord;
use crate::store::ClipStore;

/// Most rows a single query returns.
pub const QUERY_LIMIT: i64 = 50;

const DB_FILE: &str = "history.db";
const POOL_SIZE: u32 = 4;

/// Indexed-variant store: one SQLite relation with content uniqueness.
/// Connections come from a pool so the monitor thread can write while
/// the UI thread queries.
pub struct HistoryDb {
    pool: Pool<SqliteConnectionManager>,
}

impl HistoryDb {
    /// Open (or create) the database under the per-user data directory.
    pub fn open_default() -> Result<Self, Error> {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clipkeep");
        Self::open(dir.join(DB_FILE))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Persistence(e.to_string()))?;
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;

        let conn = pool.get()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(HistoryDb { pool })
    }
}

/// Make LIKE wildcards in a user search term match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClipRecord> {
    Ok(ClipRecord {
        id: row.get(0)?,
        content: row.get(1)?,
        created_at: row.get(2)?,
    })
}

impl ClipStore for HistoryDb {
    /// Delete-then-reinsert inside one transaction, so a repeated clip
    /// jumps back to the top of the history. The UNIQUE constraint on
    /// content backstops any race toward duplicate rows.
    fn append(&self, content: &str) -> Result<(), Error> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM history WHERE content = ?1", params![content])?;
        tx.execute("INSERT INTO history (content) VALUES (?1)", params![content])?;
        tx.commit()?;
        Ok(())
    }

    /// The 50 most recent rows by id descending, optionally narrowed
    /// to rows containing `filter` as a literal substring. Matching
    /// follows SQLite LIKE semantics: ASCII letters compare
    /// case-insensitively, anything else case-sensitively.
    fn recent(&self, filter: &str) -> Result<Vec<ClipRecord>, Error> {
        let conn = self.pool.get()?;
        let mut records = Vec::new();

        if filter.is_empty() {
            let mut stmt = conn.prepare(
                "SELECT id, content, created_at FROM history
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![QUERY_LIMIT], map_record)?;
            for row in rows {
                records.push(row?);
            }
        } else {
            let pattern = format!("%{}%", escape_like(filter));
            let mut stmt = conn.prepare(
                "SELECT id, content, created_at FROM history
                 WHERE content LIKE ?1 ESCAPE '\\'
                 ORDER BY id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![pattern, QUERY_LIMIT], map_record)?;
            for row in rows {
                records.push(row?);
            }
        }

        Ok(records)
    }
}
