//! Track records and their SQLite persistence.

mod models;
mod schema;
mod store;

pub use models::{Track, TrackStatus, TrackUpdate};
pub use schema::{TRACKS_SCHEMA_SQL, TRACKS_SCHEMA_VERSION};
pub use store::{SqliteTrackStore, TrackStore};
