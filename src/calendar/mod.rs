pub mod event;
pub mod team_calendar;
pub mod calendar_cache;

pub use event::{EventId, TeamEvent};
pub use team_calendar::TeamCalendar;
pub use calendar_cache::CalendarCache;

pub type CalendarId = i32;
pub type UserId = i32;
pub type GroupId = i32;

/// Virtual calendar showing the viewer's time sheets.
pub const TIMESHEET_CALENDAR_ID: CalendarId = -1;

pub const TIMESHEET_EVENT_CLASS: &str = "timesheet";

/// Key used by the rendering layer to tell event sources apart.
pub fn calendar_key(calendar_id: Option<CalendarId>) -> String {
    match calendar_id {
        None | Some(TIMESHEET_CALENDAR_ID) => TIMESHEET_EVENT_CLASS.to_string(),
        Some(id) => id.to_string(),
    }
}
