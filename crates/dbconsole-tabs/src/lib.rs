//! dbconsole Tab Management
//!
//! Object viewer tabs are bound to one navigation node and show one of the
//! registered pages (data viewer, properties, ...). The tab manager owns the
//! tabs and raises the select / restore / close hooks of the page a tab shows.

mod error;
mod manager;
mod page;
mod state;
mod tab;

pub use error::{HookError, TabError};
pub use manager::TabManager;
pub use page::{PageDescriptor, PageHandle, PageHooks, PageRegistry};
pub use state::TabState;
pub use tab::{HandlerState, Tab};

pub type Result<T> = std::result::Result<T, TabError>;
