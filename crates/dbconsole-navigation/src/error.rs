//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Navigation context is missing {0}")]
    MissingContext(&'static str),
}
