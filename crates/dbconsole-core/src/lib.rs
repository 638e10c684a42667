//! dbconsole Core
//!
//! Composition root of the database console: wires the node loader, the
//! navigation bus, the tab manager and the data viewer page together.

mod config;
mod console;
mod error;

pub use config::Config;
pub use console::Console;
pub use error::CoreError;

// Re-export core components
pub use dbconsole_data_viewer::{
    DataViewerError, DataViewerPagePlacement, NotificationSink, TableModel, TableModelStore,
    TracingNotificationSink, DATA_VIEWER_PAGE_KEY,
};
pub use dbconsole_navigation::{
    InMemoryNodeLoader, NavigationError, Navigator, Node, NodeFeature, NodeIdentity, NodeLoader,
};
pub use dbconsole_storage::{Database, StorageError};
pub use dbconsole_tabs::{PageRegistry, Tab, TabError, TabManager, TabState};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging; `RUST_LOG` overrides the configured filter
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    fmt().with_env_filter(filter).with_target(true).init();
}
