//! Data viewer page registration

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use dbconsole_navigation::{HandlerRegistration, Navigator, NodeLoader};
use dbconsole_tabs::{PageDescriptor, PageHandle, PageRegistry};

use crate::binder::NavigationBinder;
use crate::coordinator::TabLifecycleCoordinator;
use crate::notification::NotificationSink;
use crate::table_model::TableModelStore;

pub const DATA_VIEWER_PAGE_KEY: &str = "data-viewer";

/// Where the data viewer page sits among object viewer pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataViewerPagePlacement {
    pub priority: i32,
    pub order: i32,
}

impl Default for DataViewerPagePlacement {
    fn default() -> Self {
        Self {
            priority: 2,
            order: 2,
        }
    }
}

pub struct DataViewerTabService {
    page: PageHandle,
    coordinator: Arc<TabLifecycleCoordinator>,
    binder: Arc<NavigationBinder>,
}

impl DataViewerTabService {
    /// Register the data viewer page with its lifecycle hooks
    pub fn new(
        loader: Arc<dyn NodeLoader>,
        tables: TableModelStore,
        notifications: Arc<dyn NotificationSink>,
        pages: &PageRegistry,
        placement: DataViewerPagePlacement,
    ) -> Self {
        let coordinator = Arc::new(TabLifecycleCoordinator::new(Arc::clone(&loader), tables));
        let binder = Arc::new(NavigationBinder::new(
            loader,
            notifications,
            DATA_VIEWER_PAGE_KEY,
        ));

        let page = pages.register(PageDescriptor {
            key: DATA_VIEWER_PAGE_KEY.to_string(),
            navigator_id: "database".to_string(),
            priority: placement.priority,
            order: placement.order,
            tab_component: "DataViewerTab".to_string(),
            panel_component: "DataViewerPanel".to_string(),
            hooks: coordinator.clone(),
        });

        Self {
            page,
            coordinator,
            binder,
        }
    }

    /// Start reacting to navigation events
    pub fn register_tab_handler(&self, navigator: &Navigator) -> HandlerRegistration {
        navigator.add_handler(self.binder.clone())
    }

    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    pub fn tables(&self) -> &TableModelStore {
        self.coordinator.tables()
    }
}
