//! SQLite entry store for ACC.
//!
//! Persists excerpts, their tags and user titles in a single database file.

mod backend;
mod schema;

pub use backend::SqliteEntryStore;
