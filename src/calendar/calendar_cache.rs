use std::collections::BTreeMap;

use super::{CalendarId, TeamCalendar};

/// Read-only lookup of calendar metadata by id.
///
/// Built once at startup and handed out by reference; nothing in the query
/// path writes to it.
#[derive(Debug, Clone, Default)]
pub struct CalendarCache {
    calendars: BTreeMap<CalendarId, TeamCalendar>,
}

impl CalendarCache {
    pub fn new(calendars: impl IntoIterator<Item = TeamCalendar>) -> Self {
        let calendars = calendars
            .into_iter()
            .map(|calendar| (calendar.id, calendar))
            .collect();
        Self { calendars }
    }

    pub fn get_calendar(&self, id: CalendarId) -> Option<&TeamCalendar> {
        self.calendars.get(&id)
    }

    /// Resolves every id it can; unknown ids are logged and left out.
    pub fn get_calendars<'a>(&'a self, ids: impl IntoIterator<Item = CalendarId>) -> Vec<&'a TeamCalendar> {
        let mut result = Vec::new();
        for id in ids {
            match self.get_calendar(id) {
                Some(calendar) => result.push(calendar),
                None => tracing::error!("Calendar with id {} not found in calendar cache", id),
            }
        }
        result
    }

    pub fn all(&self) -> impl Iterator<Item = &TeamCalendar> {
        self.calendars.values()
    }

    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cache() -> CalendarCache {
        CalendarCache::new(vec![
            TeamCalendar::new(3, "Support"),
            TeamCalendar::new(1, "Development"),
            TeamCalendar::new(2, "Holidays"),
        ])
    }

    #[test]
    fn finds_calendar_by_id() {
        let cache = create_test_cache();

        let calendar = cache.get_calendar(2).unwrap();

        assert_eq!(calendar.title, "Holidays");
    }

    #[test]
    fn unknown_id_returns_none() {
        let cache = create_test_cache();

        assert!(cache.get_calendar(99).is_none());
    }

    #[test]
    fn get_calendars_skips_unknown_ids() {
        let cache = create_test_cache();

        let calendars = cache.get_calendars(vec![1, 42, 3]);

        let ids: Vec<CalendarId> = calendars.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn all_is_ordered_by_id() {
        let cache = create_test_cache();

        let ids: Vec<CalendarId> = cache.all().map(|c| c.id).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn default_cache_is_empty() {
        assert!(CalendarCache::default().is_empty());
    }
}
