use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CalendarId;

pub type EventId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEvent {
    pub id: EventId,
    pub calendar_id: CalendarId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub subject: String,
    pub location: String,
    pub note: String,
    pub attendees: Vec<String>,
    pub deleted: bool,
    pub last_update: DateTime<Utc>,
}

impl TeamEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Blanks everything but the scheduling information.
    pub fn redact(&mut self) {
        self.subject.clear();
        self.location.clear();
        self.note.clear();
        self.attendees.clear();
    }

    pub fn is_redacted(&self) -> bool {
        self.subject.is_empty()
            && self.location.is_empty()
            && self.note.is_empty()
            && self.attendees.is_empty()
    }
}
