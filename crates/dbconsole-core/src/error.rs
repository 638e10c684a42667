//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] dbconsole_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] dbconsole_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] dbconsole_navigation::NavigationError),

    #[error("Data viewer error: {0}")]
    DataViewer(#[from] dbconsole_data_viewer::DataViewerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
