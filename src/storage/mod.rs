pub mod event_store;
pub mod preferences;
pub mod config;

pub use event_store::{EventStore, SqliteEventStore, StoreError};
pub use preferences::{PreferenceError, PreferenceStore};
