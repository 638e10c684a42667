//! dbconsole Data Viewer
//!
//! Binds a data grid session (table model) to each object viewer tab that
//! shows a data container:
//! - navigation to a data node in a new tab switches the tab to this page
//! - selecting the tab creates its table model once
//! - closing the tab releases it

mod binder;
mod coordinator;
mod error;
mod notification;
mod service;
mod table_model;

pub use binder::{NavigationBinder, NAVIGATION_ERROR_MESSAGE};
pub use coordinator::TabLifecycleCoordinator;
pub use error::DataViewerError;
pub use notification::{NotificationSink, TracingNotificationSink};
pub use service::{DataViewerPagePlacement, DataViewerTabService, DATA_VIEWER_PAGE_KEY};
pub use table_model::{TableModel, TableModelStore};

pub type Result<T> = std::result::Result<T, DataViewerError>;
