use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::calendar::CalendarId;

/// Query window; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// With both bounds an event is selected when it starts or ends inside the
    /// window or spans it completely. A single bound only looks at the event
    /// start.
    pub fn selects(&self, event_start: DateTime<Utc>, event_end: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                (event_start >= start && event_start <= end)
                    || (event_end >= start && event_end <= end)
                    || (event_start <= start && event_end >= end)
            }
            (Some(start), None) => event_start >= start,
            (None, Some(end)) => event_start <= end,
            (None, None) => true,
        }
    }
}

/// What a caller asks for: a window, the calendars to search and the
/// deletion state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub window: TimeWindow,
    pub calendar_ids: BTreeSet<CalendarId>,
    pub deleted: bool,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(mut self, calendar_id: CalendarId) -> Self {
        self.calendar_ids.insert(calendar_id);
        self
    }

    pub fn with_calendars(mut self, calendar_ids: impl IntoIterator<Item = CalendarId>) -> Self {
        self.calendar_ids.extend(calendar_ids);
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn to_query(&self) -> EventQuery {
        EventQuery {
            window: self.window,
            calendar_ids: self.calendar_ids.clone(),
            deleted: self.deleted,
            not_before: None,
        }
    }
}

/// Structured filter handed to an [`crate::storage::EventStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub window: TimeWindow,
    pub calendar_ids: BTreeSet<CalendarId>,
    pub deleted: bool,
    /// Lower limit on the event start, independent of the window.
    pub not_before: Option<DateTime<Utc>>,
}
