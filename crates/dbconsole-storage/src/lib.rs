//! dbconsole Storage Layer
//!
//! SQLite persistence for open object viewer tabs and console settings.
//! Table models are never persisted; they are rebuilt when a restored tab is selected.

mod database;
mod error;
mod migrations;
mod tab_store;

pub use database::Database;
pub use error::StorageError;
pub use tab_store::TabRecord;

pub type Result<T> = std::result::Result<T, StorageError>;
