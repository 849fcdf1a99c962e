use rusqlite::{types::Value, Connection, Result as SqliteResult};
use thiserror::Error;

use crate::calendar::{EventId, GroupId, TeamCalendar, TeamEvent, UserId};
use crate::query::EventQuery;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Event not found: {0}")]
    NotFound(EventId),
}

/// Read access to persisted events.
#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    /// Returns matching events ordered by descending start.
    fn query_events(&self, query: &EventQuery) -> Result<Vec<TeamEvent>, StoreError>;
}

pub struct SqliteEventStore {
    conn: Connection,
}

impl SqliteEventStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS calendars (
                id INTEGER PRIMARY KEY,
                data TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS group_members (
                group_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                PRIMARY KEY (group_id, user_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY,
                calendar_id INTEGER NOT NULL,
                data TEXT NOT NULL,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL,
                deleted INTEGER NOT NULL DEFAULT 0,
                last_update TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_events_calendar_start ON events (calendar_id, start_ms)",
            [],
        )?;

        Ok(())
    }

    pub fn store_calendar(&self, calendar: &TeamCalendar) -> Result<(), StoreError> {
        let data = serde_json::to_string(calendar)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO calendars (id, data) VALUES (?1, ?2)",
            rusqlite::params![calendar.id, &data],
        )?;
        Ok(())
    }

    pub fn load_calendars(&self) -> Result<Vec<TeamCalendar>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT data FROM calendars ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut calendars = Vec::new();
        for data in rows {
            calendars.push(serde_json::from_str(&data?)?);
        }
        Ok(calendars)
    }

    pub fn add_group_member(&self, group_id: GroupId, user_id: UserId) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO group_members (group_id, user_id) VALUES (?1, ?2)",
            [group_id, user_id],
        )?;
        Ok(())
    }

    pub fn load_group_members(&self) -> Result<Vec<(GroupId, UserId)>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT group_id, user_id FROM group_members")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<SqliteResult<Vec<_>>>()?)
    }

    pub fn store_event(&self, event: &TeamEvent) -> Result<(), StoreError> {
        let data = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO events (id, calendar_id, data, start_ms, end_ms, deleted, last_update)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                event.id,
                event.calendar_id,
                &data,
                event.start.timestamp_millis(),
                event.end.timestamp_millis(),
                event.deleted,
                event.last_update.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn load_event(&self, id: EventId) -> Result<Option<TeamEvent>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT data FROM events WHERE id = ?1")?;
        let mut rows = stmt.query([id])?;

        if let Some(row) = rows.next()? {
            let data: String = row.get(0)?;
            let event: TeamEvent = serde_json::from_str(&data)?;
            Ok(Some(event))
        } else {
            Ok(None)
        }
    }

    /// Soft delete: the event stays queryable with `deleted = true`.
    pub fn mark_deleted(&self, id: EventId) -> Result<(), StoreError> {
        let mut event = self.load_event(id)?.ok_or(StoreError::NotFound(id))?;
        event.deleted = true;
        event.last_update = chrono::Utc::now();
        self.store_event(&event)
    }

    pub fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }
}

fn build_select(query: &EventQuery) -> (String, Vec<Value>) {
    let mut sql = String::from("SELECT data FROM events WHERE deleted = ?");
    let mut params = vec![Value::from(query.deleted)];

    let placeholders = vec!["?"; query.calendar_ids.len()].join(", ");
    sql.push_str(&format!(" AND calendar_id IN ({})", placeholders));
    params.extend(query.calendar_ids.iter().map(|id| Value::from(*id)));

    match (query.window.start, query.window.end) {
        (Some(start), Some(end)) => {
            let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
            sql.push_str(
                " AND ((start_ms BETWEEN ? AND ?) OR (end_ms BETWEEN ? AND ?) OR (start_ms <= ? AND end_ms >= ?))",
            );
            params.extend([start, end, start, end, start, end].map(Value::from));
        }
        (Some(start), None) => {
            sql.push_str(" AND start_ms >= ?");
            params.push(Value::from(start.timestamp_millis()));
        }
        (None, Some(end)) => {
            sql.push_str(" AND start_ms <= ?");
            params.push(Value::from(end.timestamp_millis()));
        }
        (None, None) => {}
    }

    if let Some(not_before) = query.not_before {
        sql.push_str(" AND start_ms >= ?");
        params.push(Value::from(not_before.timestamp_millis()));
    }

    sql.push_str(" ORDER BY start_ms DESC, id DESC");
    (sql, params)
}

impl EventStore for SqliteEventStore {
    fn query_events(&self, query: &EventQuery) -> Result<Vec<TeamEvent>, StoreError> {
        if query.calendar_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (sql, params) = build_select(query);
        tracing::debug!("Event query: {} ({} parameters)", sql, params.len());

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| row.get::<_, String>(0))?;

        let mut events = Vec::new();
        for data in rows {
            events.push(serde_json::from_str(&data?)?);
        }
        Ok(events)
    }
}
