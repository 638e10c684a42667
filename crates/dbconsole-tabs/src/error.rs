//! Tab error types

use thiserror::Error;

/// Error raised by a page hook
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Page not registered: {0}")]
    PageNotFound(String),

    #[error("Page {page} failed for tab {tab_id}: {source}")]
    Page {
        page: String,
        tab_id: String,
        #[source]
        source: HookError,
    },

    #[error("Invalid object id: {0}")]
    InvalidObject(String),

    #[error("Storage error: {0}")]
    Storage(#[from] dbconsole_storage::StorageError),
}

