use chrono::{DateTime, Months, Utc};
use thiserror::Error;

use crate::access::{access_tier, AccessEvaluator, Visibility};
use crate::calendar::{CalendarCache, CalendarId, TeamEvent, UserId};
use crate::storage::{EventStore, StoreError};
use super::{EventFilter, EventQuery, TimeWindow};

/// How far back [`TeamEventDao::get_recent_list`] looks.
pub const RECENT_LIST_MONTHS: u32 = 12;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
}

/// Event queries filtered by the viewer's access to the owning calendar.
pub struct TeamEventDao<'a, S: EventStore + ?Sized, A: AccessEvaluator + ?Sized> {
    store: &'a S,
    calendars: &'a CalendarCache,
    access: &'a A,
}

impl<'a, S: EventStore + ?Sized, A: AccessEvaluator + ?Sized> TeamEventDao<'a, S, A> {
    pub fn new(store: &'a S, calendars: &'a CalendarCache, access: &'a A) -> Self {
        Self { store, calendars, access }
    }

    /// Events of the filter's calendars inside its window, newest first.
    ///
    /// An empty calendar set yields no events rather than an unscoped scan.
    pub fn get_list(&self, filter: &EventFilter, viewer: UserId) -> Result<Vec<TeamEvent>, QueryError> {
        if filter.calendar_ids.is_empty() {
            tracing::debug!("Event filter without calendars, returning no events");
            return Ok(Vec::new());
        }
        tracing::debug!("Querying events: {:?}", filter);

        let events = self.store.query_events(&filter.to_query())?;
        Ok(self.hide_by_access(events, viewer))
    }

    /// Lightweight preview of one calendar: events that started at most a
    /// year before `now`.
    pub fn get_recent_list(
        &self,
        calendar_id: CalendarId,
        deleted: bool,
        viewer: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<TeamEvent>, QueryError> {
        let not_before = now
            .checked_sub_months(Months::new(RECENT_LIST_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let query = EventQuery {
            window: TimeWindow::default(),
            calendar_ids: [calendar_id].into(),
            deleted,
            not_before: Some(not_before),
        };
        tracing::debug!("Querying recent events: {:?}", query);

        let events = self.store.query_events(&query)?;
        Ok(self.hide_by_access(events, viewer))
    }

    /// Passes, redacts or drops every event on its own, keeping the order.
    pub fn hide_by_access(&self, events: Vec<TeamEvent>, viewer: UserId) -> Vec<TeamEvent> {
        let total = events.len();
        let visible: Vec<TeamEvent> = events
            .into_iter()
            .filter_map(|mut event| {
                let Some(calendar) = self.calendars.get_calendar(event.calendar_id) else {
                    tracing::error!(
                        "Calendar {} of event {} not found in calendar cache, skipping event",
                        event.calendar_id,
                        event.id
                    );
                    return None;
                };
                match access_tier(self.access, viewer, calendar).visibility() {
                    Visibility::Full => Some(event),
                    Visibility::Redacted => {
                        event.redact();
                        Some(event)
                    }
                    Visibility::Hidden => None,
                }
            })
            .collect();

        if visible.len() < total {
            tracing::warn!("Hid {} of {} events from user {}", total - visible.len(), total, viewer);
        }
        visible
    }
}
