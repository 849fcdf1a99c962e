pub mod cached;
pub mod calendar_properties;
pub mod template_entry;
pub mod calendar_filter;

use thiserror::Error;

use crate::calendar::CalendarId;

pub use cached::Cached;
pub use calendar_properties::CalendarProperties;
pub use template_entry::TemplateEntry;
pub use calendar_filter::CalendarFilter;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Calendar {0} is already part of the template")]
    CalendarAlreadyPresent(CalendarId),
    #[error("Calendar {0} is not part of the template")]
    UnknownCalendar(CalendarId),
    #[error("Invalid color code: {0}")]
    InvalidColorCode(String),
    #[error("Template not found: {0}")]
    UnknownTemplate(String),
    #[error("No active template")]
    NoActiveTemplate,
    #[error("Snapshot error: {0}")]
    SnapshotError(#[from] serde_json::Error),
}
