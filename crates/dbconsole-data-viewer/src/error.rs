//! Data viewer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataViewerError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] dbconsole_navigation::NavigationError),

    #[error("Table model already exists for tab {0}")]
    ResourceConflict(String),
}
