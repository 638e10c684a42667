//! dbconsole Navigation
//!
//! The navigation tree as seen by object viewer pages:
//! - `Node` metadata resolved on demand through a `NodeLoader`
//! - Navigation events raised when the user focuses a node
//! - The `Navigator` bus that fans events out to registered handlers

mod error;
mod event;
mod loader;
mod navigator;
mod node;

pub use error::NavigationError;
pub use event::{
    NavigationEvent, NavigationType, NodeNavigationData, ObjectViewerContext, PageSwitcher,
    TabNavigationInfo,
};
pub use loader::{InMemoryNodeLoader, NodeLoader};
pub use navigator::{HandlerRegistration, NavigationHandler, Navigator};
pub use node::{
    connection_id_to_node_id, connection_node_id_to_connection_id, Node, NodeContainerInfo,
    NodeFeature, NodeIdentity, CONNECTION_NODE_PREFIX,
};

pub type Result<T> = std::result::Result<T, NavigationError>;
