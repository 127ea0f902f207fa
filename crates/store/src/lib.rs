//! Persistence for sample history: one append-only CSV file per entity.

pub mod csv;
pub mod watcher;

pub use csv::{CsvStore, HEADER, TIMESTAMP_FORMAT};
pub use watcher::DataWatcher;
