//! Navigation binding
//!
//! Moves a newly created object viewer tab to the data viewer page when the
//! navigated node holds data. Failures are reported and never reach the
//! navigation bus.

use async_trait::async_trait;
use std::sync::Arc;

use dbconsole_navigation::{
    NavigationError, NavigationEvent, NavigationHandler, NavigationType, NodeLoader,
};

use crate::notification::NotificationSink;

pub const NAVIGATION_ERROR_MESSAGE: &str =
    "Error in Data Viewer while processing action with database node";

pub struct NavigationBinder {
    loader: Arc<dyn NodeLoader>,
    notifications: Arc<dyn NotificationSink>,
    page_key: String,
}

impl NavigationBinder {
    pub fn new(
        loader: Arc<dyn NodeLoader>,
        notifications: Arc<dyn NotificationSink>,
        page_key: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            notifications,
            page_key: page_key.into(),
        }
    }

    async fn process(&self, event: &NavigationEvent) -> Result<(), NavigationError> {
        if event.node_info.navigation_type == NavigationType::CloseConnection {
            return Ok(());
        }

        let context = event.object_viewer_context()?;
        let node = self.loader.load(&context.node_info.identity()).await?;

        if !node.has_data() {
            return Ok(());
        }

        if context.tab_info.is_newly_created && !context.try_switch_page(&self.page_key) {
            tracing::debug!(
                tab_id = %context.tab_info.tab_id,
                page = %self.page_key,
                "Tab refused data viewer page"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl NavigationHandler for NavigationBinder {
    async fn handle(&self, event: &NavigationEvent) {
        if let Err(e) = self.process(event).await {
            self.notifications.log_exception(&e, NAVIGATION_ERROR_MESSAGE);
        }
    }
}
