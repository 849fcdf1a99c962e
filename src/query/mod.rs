pub mod event_filter;
pub mod team_event_dao;

pub use event_filter::{EventFilter, EventQuery, TimeWindow};
pub use team_event_dao::{QueryError, TeamEventDao};
