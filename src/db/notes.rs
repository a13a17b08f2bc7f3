//! Note repository
//!
//! The session loop only ever appends; listing exists for the `valet notes`
//! subcommand.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::command::NoteStore;
use crate::{Error, Result};

/// A saved note
#[derive(Debug, Clone)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Note repository
#[derive(Clone)]
pub struct NoteRepo {
    pool: DbPool,
}

impl NoteRepo {
    /// Create a new note repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append a note
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn add(&self, text: &str) -> Result<Note> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, text, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, text, now.to_rfc3339()],
        )?;

        tracing::debug!(id = %id, "note saved");

        Ok(Note {
            id,
            text: text.to_string(),
            created_at: now,
        })
    }

    /// Most recent notes, newest first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn recent(&self, limit: usize) -> Result<Vec<Note>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn.prepare(
            "SELECT id, text, created_at FROM notes ORDER BY created_at DESC, id LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let notes = stmt
            .query_map([limit], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }
}

impl NoteStore for NoteRepo {
    fn append(&self, text: &str) -> Result<()> {
        self.add(text).map(|_| ())
    }
}

/// Parse an RFC 3339 timestamp, defaulting to now on malformed rows
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
