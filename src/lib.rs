pub mod calendar;
pub mod access;
pub mod template;
pub mod query;
pub mod storage;

pub use calendar::{CalendarCache, TeamCalendar, TeamEvent};
pub use access::{AccessEvaluator, AccessTier, CalendarRight, UserGroupCache};
pub use template::{CalendarFilter, CalendarProperties, TemplateEntry};
pub use query::{EventFilter, TeamEventDao, TimeWindow};
