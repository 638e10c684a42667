//! Tab lifecycle coordination
//!
//! Select creates the tab's table model once, restore refreshes the node,
//! close releases the model. Node loads are the only suspension points;
//! a tab closed while its select is still loading gets no model.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dbconsole_navigation::{connection_node_id_to_connection_id, NodeLoader};
use dbconsole_tabs::{HookError, PageHooks, Tab};

use crate::table_model::TableModelStore;
use crate::Result;

/// Page hooks that keep one table model per open data viewer tab
pub struct TabLifecycleCoordinator {
    loader: Arc<dyn NodeLoader>,
    tables: TableModelStore,
    /// Open tabs and the epoch they were first seen in
    open_tabs: Mutex<HashMap<String, u64>>,
    next_epoch: AtomicU64,
}

impl TabLifecycleCoordinator {
    pub fn new(loader: Arc<dyn NodeLoader>, tables: TableModelStore) -> Self {
        Self {
            loader,
            tables,
            open_tabs: Mutex::new(HashMap::new()),
            next_epoch: AtomicU64::new(0),
        }
    }

    pub fn tables(&self) -> &TableModelStore {
        &self.tables
    }

    /// Bind a table model to the tab if its node holds data.
    ///
    /// Load failures propagate to the caller.
    pub async fn select(&self, tab: &Tab) -> Result<()> {
        let epoch = self.track(&tab.id);
        let node = self
            .loader
            .load(&tab.handler_state.node_identity())
            .await?;

        if !node.has_data() {
            tracing::debug!(tab_id = %tab.id, node_id = %node.id, "Node has no data");
            return Ok(());
        }

        if self.tables.has(&tab.id) {
            return Ok(());
        }

        let Some(connection_node_id) = node.container_info().connection_id.as_deref() else {
            tracing::debug!(tab_id = %tab.id, node_id = %node.id, "Node is outside any connection");
            return Ok(());
        };

        if !self.is_current(&tab.id, epoch) {
            tracing::debug!(tab_id = %tab.id, "Tab closed while its node was loading");
            return Ok(());
        }

        self.tables.create(
            &tab.id,
            connection_node_id_to_connection_id(connection_node_id),
            tab.object_id(),
        )?;

        Ok(())
    }

    /// Reload the tab's node; the tab stays restorable whenever it loads
    pub async fn restore(&self, tab: &Tab) -> Result<bool> {
        self.loader
            .load(&tab.handler_state.node_identity())
            .await?;
        self.track(&tab.id);
        Ok(true)
    }

    pub fn close(&self, tab: &Tab) {
        self.open_tabs.lock().remove(&tab.id);
        if self.tables.remove(&tab.id).is_none() {
            tracing::debug!(tab_id = %tab.id, "Closed tab had no table model");
        }
    }

    fn track(&self, tab_id: &str) -> u64 {
        *self
            .open_tabs
            .lock()
            .entry(tab_id.to_string())
            .or_insert_with(|| self.next_epoch.fetch_add(1, Ordering::SeqCst))
    }

    fn is_current(&self, tab_id: &str, epoch: u64) -> bool {
        self.open_tabs.lock().get(tab_id) == Some(&epoch)
    }

    #[cfg(test)]
    fn is_tracked(&self, tab_id: &str) -> bool {
        self.open_tabs.lock().contains_key(tab_id)
    }
}

#[async_trait]
impl PageHooks for TabLifecycleCoordinator {
    async fn on_select(&self, tab: &Tab) -> std::result::Result<(), HookError> {
        Ok(self.select(tab).await?)
    }

    async fn on_restore(&self, tab: &Tab) -> std::result::Result<bool, HookError> {
        Ok(self.restore(tab).await?)
    }

    fn on_close(&self, tab: &Tab) {
        self.close(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataViewerError;
    use dbconsole_navigation::{
        InMemoryNodeLoader, NavigationError, Node, NodeFeature, NodeIdentity,
    };
    use tokio::sync::Notify;

    fn loader() -> InMemoryNodeLoader {
        let loader = InMemoryNodeLoader::new();
        loader.insert(Node::new("database://c1", None, "c1").with_feature(NodeFeature::Connection));
        loader.insert(
            Node::new("o1", Some("database://c1"), "orders").with_feature(NodeFeature::DataContainer),
        );
        loader.insert(
            Node::new("tables", Some("database://c1"), "Tables").with_feature(NodeFeature::Folder),
        );
        loader.insert(Node::new("loose", None, "loose").with_feature(NodeFeature::DataContainer));
        loader
    }

    fn tab(id: &str, object_id: &str) -> Tab {
        let mut tab = Tab::new(
            "data-viewer".to_string(),
            object_id.to_string(),
            Some("database://c1".to_string()),
        )
        .unwrap();
        tab.id = id.to_string();
        tab
    }

    fn coordinator(loader: InMemoryNodeLoader) -> TabLifecycleCoordinator {
        TabLifecycleCoordinator::new(Arc::new(loader), TableModelStore::new())
    }

    #[tokio::test]
    async fn test_select_binds_table_model() {
        let coordinator = coordinator(loader());
        coordinator.select(&tab("t1", "o1")).await.unwrap();

        let model = coordinator.tables().get("t1").unwrap();
        assert_eq!(model.id, "t1");
        assert_eq!(model.connection_id, "c1");
        assert_eq!(model.container_node_id, "o1");
    }

    #[tokio::test]
    async fn test_select_twice_creates_once() {
        let coordinator = coordinator(loader());
        let t1 = tab("t1", "o1");

        coordinator.select(&t1).await.unwrap();
        let first = coordinator.tables().get("t1").unwrap();
        coordinator.select(&t1).await.unwrap();

        assert_eq!(coordinator.tables().len(), 1);
        assert_eq!(coordinator.tables().get("t1").unwrap(), first);
    }

    #[tokio::test]
    async fn test_two_tabs_same_object() {
        let coordinator = coordinator(loader());
        let t1 = tab("t1", "o1");
        let t2 = tab("t2", "o1");

        coordinator.select(&t1).await.unwrap();
        coordinator.select(&t2).await.unwrap();
        assert_eq!(coordinator.tables().tab_ids(), vec!["t1", "t2"]);

        coordinator.close(&t1);
        assert!(!coordinator.tables().has("t1"));
        assert!(coordinator.tables().has("t2"));
    }

    #[tokio::test]
    async fn test_select_without_data_or_connection() {
        let coordinator = coordinator(loader());

        coordinator.select(&tab("t1", "tables")).await.unwrap();
        coordinator.select(&tab("t2", "loose")).await.unwrap();

        assert!(coordinator.tables().is_empty());
    }

    #[tokio::test]
    async fn test_select_load_failure_propagates() {
        let coordinator = coordinator(loader());
        let result = coordinator.select(&tab("t1", "missing")).await;

        assert!(matches!(
            result,
            Err(DataViewerError::Navigation(NavigationError::NodeNotFound(_)))
        ));
        assert!(!coordinator.tables().has("t1"));
    }

    #[tokio::test]
    async fn test_close_releases_model() {
        let coordinator = coordinator(loader());
        let t1 = tab("t1", "o1");

        // Closing before any select is a no-op
        coordinator.close(&t1);

        coordinator.select(&t1).await.unwrap();
        coordinator.close(&t1);
        assert!(!coordinator.tables().has("t1"));

        // Reopening rebinds
        coordinator.select(&t1).await.unwrap();
        assert!(coordinator.tables().has("t1"));
    }

    #[tokio::test]
    async fn test_restore_reloads_node() {
        let nodes = loader();
        let coordinator = coordinator(nodes.clone());

        assert!(coordinator.restore(&tab("t1", "o1")).await.unwrap());
        assert_eq!(nodes.load_count(), 1);
        assert!(coordinator.tables().is_empty());

        let result = coordinator.restore(&tab("t2", "missing")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_restore_leaves_no_open_tab() {
        let coordinator = coordinator(loader());

        assert!(coordinator.restore(&tab("t1", "missing")).await.is_err());
        assert!(!coordinator.is_tracked("t1"));

        assert!(coordinator.restore(&tab("t2", "o1")).await.unwrap());
        assert!(coordinator.is_tracked("t2"));
        coordinator.close(&tab("t2", "o1"));
        assert!(!coordinator.is_tracked("t2"));
    }

    #[tokio::test]
    async fn test_hooks_box_errors() {
        let coordinator = coordinator(loader());
        let err = coordinator
            .on_select(&tab("t1", "missing"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Navigation error: Node not found: missing");
    }

    struct GatedLoader {
        inner: InMemoryNodeLoader,
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl NodeLoader for GatedLoader {
        async fn load(&self, identity: &NodeIdentity) -> dbconsole_navigation::Result<Node> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.load(identity).await
        }
    }

    #[tokio::test]
    async fn test_close_during_select_load() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let coordinator = Arc::new(TabLifecycleCoordinator::new(
            Arc::new(GatedLoader {
                inner: loader(),
                entered: entered.clone(),
                release: release.clone(),
            }),
            TableModelStore::new(),
        ));
        let t1 = tab("t1", "o1");

        let pending = {
            let coordinator = coordinator.clone();
            let t1 = t1.clone();
            tokio::spawn(async move { coordinator.select(&t1).await })
        };

        entered.notified().await;
        coordinator.close(&t1);
        release.notify_one();

        pending.await.unwrap().unwrap();
        assert!(!coordinator.tables().has("t1"));
    }
}
