use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use crate::calendar::UserId;
use crate::template::{CalendarFilter, TemplateError};

pub const FILTER_PREFERENCE_KEY: &str = "teamcal.filter";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Invalid filter snapshot: {0}")]
    SnapshotError(#[from] TemplateError),
}

/// Opaque per-user preference blobs.
pub struct PreferenceStore<'a> {
    conn: &'a Connection,
}

impl<'a> PreferenceStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn initialize(&self) -> Result<(), PreferenceError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS user_preferences (
                user_id INTEGER NOT NULL,
                key TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (user_id, key)
            )",
            [],
        )?;
        Ok(())
    }

    pub fn save(&self, user_id: UserId, key: &str, data: &str) -> Result<(), PreferenceError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_preferences (user_id, key, data) VALUES (?1, ?2, ?3)",
            rusqlite::params![user_id, key, data],
        )?;
        Ok(())
    }

    pub fn load(&self, user_id: UserId, key: &str) -> Result<Option<String>, PreferenceError> {
        let data = self
            .conn
            .query_row(
                "SELECT data FROM user_preferences WHERE user_id = ?1 AND key = ?2",
                rusqlite::params![user_id, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }

    pub fn remove(&self, user_id: UserId, key: &str) -> Result<(), PreferenceError> {
        self.conn.execute(
            "DELETE FROM user_preferences WHERE user_id = ?1 AND key = ?2",
            rusqlite::params![user_id, key],
        )?;
        Ok(())
    }

    pub fn save_filter(&self, user_id: UserId, filter: &CalendarFilter) -> Result<(), PreferenceError> {
        let snapshot = filter.to_snapshot()?;
        tracing::debug!("Saving calendar filter for user {} ({} bytes)", user_id, snapshot.len());
        self.save(user_id, FILTER_PREFERENCE_KEY, &snapshot)
    }

    pub fn load_filter(&self, user_id: UserId) -> Result<Option<CalendarFilter>, PreferenceError> {
        match self.load(user_id, FILTER_PREFERENCE_KEY)? {
            Some(snapshot) => Ok(Some(CalendarFilter::from_snapshot(&snapshot)?)),
            None => Ok(None),
        }
    }
}
