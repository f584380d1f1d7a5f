use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{LexicardError, Result};
use crate::session::SessionState;

/// One known/unknown judgement, as written to the review log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: String,
    pub word: String,
    pub known: bool,
    pub timestamp: DateTime<Local>,
}

/// Persistence behind the session manager. The classification log is
/// append-only; session snapshots are replaced on every save.
pub trait ReviewStore {
    fn record_classification(&self, entry: &Classification) -> Result<()>;
    fn save_session(&self, category: &str, state: &SessionState) -> Result<()>;
    fn clear_session(&self, category: &str) -> Result<()>;
    fn load_sessions(&self) -> Result<Vec<(String, SessionState)>>;
    fn classifications(&self) -> Result<Vec<Classification>>;
    fn last_reviewed(&self, category: &str) -> Result<Option<DateTime<Local>>>;
}

#[derive(Debug)]
pub struct SqliteReviewStore {
    conn: Connection,
}

impl SqliteReviewStore {
    /// Open the store under $HOME/.local/state/lexicard
    pub fn open_default() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("lexicard_reviews.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        log::debug!("review store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS classifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                word TEXT NOT NULL,
                known BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_classifications_category
                ON classifications(category);
            CREATE TABLE IF NOT EXISTS sessions (
                category TEXT PRIMARY KEY,
                cursor INTEGER NOT NULL,
                known TEXT NOT NULL,
                unknown TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self { conn })
    }
}

fn parse_timestamp(raw: &str, column: usize) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                column,
                "timestamp".to_string(),
                rusqlite::types::Type::Text,
            )
        })
}

impl ReviewStore for SqliteReviewStore {
    fn record_classification(&self, entry: &Classification) -> Result<()> {
        self.conn.execute(
            "INSERT INTO classifications (category, word, known, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.category,
                entry.word,
                entry.known,
                entry.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn save_session(&self, category: &str, state: &SessionState) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO sessions (category, cursor, known, unknown, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(category) DO UPDATE SET
                cursor = excluded.cursor,
                known = excluded.known,
                unknown = excluded.unknown,
                updated_at = excluded.updated_at
            "#,
            params![
                category,
                state.cursor as i64,
                serde_json::to_string(&state.known)?,
                serde_json::to_string(&state.unknown)?,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn clear_session(&self, category: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE category = ?1", [category])?;
        Ok(())
    }

    fn load_sessions(&self) -> Result<Vec<(String, SessionState)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, cursor, known, unknown FROM sessions ORDER BY category")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(category, cursor, known, unknown)| -> Result<(String, SessionState)> {
                let cursor = usize::try_from(cursor).map_err(|_| {
                    LexicardError::CorruptStore(format!(
                        "stored cursor {cursor} for '{category}' is negative"
                    ))
                })?;
                let state = SessionState {
                    cursor,
                    flipped: false,
                    known: serde_json::from_str(&known)?,
                    unknown: serde_json::from_str(&unknown)?,
                };
                Ok((category, state))
            })
            .collect()
    }

    fn classifications(&self) -> Result<Vec<Classification>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, word, known, timestamp FROM classifications ORDER BY id",
        )?;
        let entries = stmt
            .query_map([], |row| {
                let raw: String = row.get(3)?;
                Ok(Classification {
                    category: row.get(0)?,
                    word: row.get(1)?,
                    known: row.get(2)?,
                    timestamp: parse_timestamp(&raw, 3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn last_reviewed(&self, category: &str) -> Result<Option<DateTime<Local>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM classifications WHERE category = ?1 ORDER BY id DESC LIMIT 1",
                [category],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(parse_timestamp(&raw, 0)?)),
            None => Ok(None),
        }
    }
}

/// Write the whole classification log as CSV, oldest first.
/// Returns the number of rows written.
pub fn export_csv<S: ReviewStore + ?Sized, W: Write>(store: &S, out: W) -> Result<usize> {
    let entries = store.classifications()?;
    let mut writer = csv::Writer::from_writer(out);
    for entry in &entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(entries.len())
}
