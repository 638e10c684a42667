//! Console state container
//!
//! Hosts the object viewer tabs: opens a tab per navigated node, raises
//! navigation events, and drives the select / restore / close hooks of the
//! registered pages.

use std::sync::Arc;

use dbconsole_data_viewer::{DataViewerTabService, NotificationSink, TableModelStore};
use dbconsole_navigation::{
    connection_node_id_to_connection_id, HandlerRegistration, NavigationEvent, Navigator,
    NodeLoader, NodeNavigationData, TabNavigationInfo,
};
use dbconsole_storage::Database;
use dbconsole_tabs::{PageRegistry, Tab, TabManager};

use crate::config::Config;
use crate::Result;

const ACTIVE_TAB_SETTING: &str = "active_tab";

pub struct Console {
    config: Config,
    db: Database,
    navigator: Navigator,
    tab_manager: TabManager,
    data_viewer: DataViewerTabService,
    /// Keeps the data viewer subscribed to navigation events
    _navigation_handler: HandlerRegistration,
}

impl Console {
    /// Open the console database and register the data viewer page
    pub fn new(
        config: Config,
        loader: Arc<dyn NodeLoader>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_database(config, db, loader, notifications))
    }

    pub fn with_database(
        config: Config,
        db: Database,
        loader: Arc<dyn NodeLoader>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        let pages = PageRegistry::new();
        let navigator = Navigator::new();

        let data_viewer = DataViewerTabService::new(
            loader,
            TableModelStore::new(),
            notifications,
            &pages,
            config.data_viewer,
        );
        let navigation_handler = data_viewer.register_tab_handler(&navigator);
        let tab_manager = TabManager::new(db.clone(), pages);

        Self {
            config,
            db,
            navigator,
            tab_manager,
            data_viewer,
            _navigation_handler: navigation_handler,
        }
    }

    /// Restore persisted tabs and reselect the last active one
    pub async fn initialize(&self) -> Result<Vec<Tab>> {
        let restored = self.tab_manager.restore_tabs().await?;

        if let Some(active_id) = self.db.get_setting(ACTIVE_TAB_SETTING)? {
            if restored.iter().any(|t| t.id == active_id) {
                if let Err(e) = self.tab_manager.select_tab(&active_id).await {
                    tracing::warn!(tab_id = %active_id, error = %e, "Could not reselect tab");
                }
            }
        }

        tracing::info!(tabs = restored.len(), "Console initialized");

        Ok(restored)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn tab_manager(&self) -> &TabManager {
        &self.tab_manager
    }

    pub fn table_models(&self) -> &TableModelStore {
        self.data_viewer.tables()
    }

    pub fn pages(&self) -> &PageRegistry {
        self.tab_manager.pages()
    }

    // === Navigation ===

    /// Focus a node: reuse or open its tab, announce the navigation, select it
    pub async fn open_node(&self, node_id: &str, parent_id: Option<&str>) -> Result<Tab> {
        let (tab, is_newly_created) = match self.tab_manager.find_by_object(node_id) {
            Some(tab) => (tab, false),
            None => (
                self.tab_manager
                    .open_tab(node_id.to_string(), parent_id.map(str::to_string))?,
                true,
            ),
        };

        let event = NavigationEvent::new(NodeNavigationData::open(node_id, parent_id)).with_tab(
            TabNavigationInfo {
                tab_id: tab.id.clone(),
                is_newly_created,
            },
            self.tab_manager.switcher(&tab.id),
        );
        self.navigator.navigate(event).await;

        self.select_tab(&tab.id).await
    }

    /// Announce a connection close and close the tabs bound to it
    pub async fn close_connection(&self, connection_node_id: &str) -> Result<Vec<String>> {
        self.navigator
            .navigate(NavigationEvent::new(NodeNavigationData::close_connection(
                connection_node_id,
            )))
            .await;

        let connection_id = connection_node_id_to_connection_id(connection_node_id);
        let bound: Vec<String> = self
            .tab_manager
            .tabs()
            .into_iter()
            .filter(|tab| {
                self.table_models()
                    .get(&tab.id)
                    .is_some_and(|model| model.connection_id == connection_id)
            })
            .map(|tab| tab.id)
            .collect();

        for tab_id in &bound {
            self.close_tab(tab_id)?;
        }

        tracing::info!(
            connection_id = %connection_id,
            closed = bound.len(),
            "Closed connection tabs"
        );

        Ok(bound)
    }

    // === Tab operations ===

    pub async fn select_tab(&self, tab_id: &str) -> Result<Tab> {
        let tab = self.tab_manager.select_tab(tab_id).await?;
        self.db.set_setting(ACTIVE_TAB_SETTING, tab_id)?;
        Ok(tab)
    }

    pub fn close_tab(&self, tab_id: &str) -> Result<()> {
        self.tab_manager.close_tab(tab_id)?;
        if self.db.get_setting(ACTIVE_TAB_SETTING)?.as_deref() == Some(tab_id) {
            self.db.remove_setting(ACTIVE_TAB_SETTING)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use dbconsole_data_viewer::{TracingNotificationSink, DATA_VIEWER_PAGE_KEY};
    use dbconsole_navigation::{InMemoryNodeLoader, Node, NodeFeature};
    use dbconsole_tabs::{TabError, TabState};

    fn node_tree() -> InMemoryNodeLoader {
        let loader = InMemoryNodeLoader::new();
        for conn in ["conn1", "conn2"] {
            let conn_node = format!("database://{conn}");
            loader.insert(Node::new(conn_node.clone(), None, conn).with_feature(NodeFeature::Connection));
            loader.insert(
                Node::new(format!("{conn_node}/table1"), Some(conn_node.as_str()), "table1")
                    .with_feature(NodeFeature::DataContainer),
            );
        }
        loader.insert(Node::new("database://conn1/folder", Some("database://conn1"), "folder"));
        loader
    }

    fn console_with(db: Database, loader: InMemoryNodeLoader) -> Console {
        Console::with_database(
            Config::new(std::env::temp_dir()),
            db,
            Arc::new(loader),
            Arc::new(TracingNotificationSink),
        )
    }

    #[tokio::test]
    async fn test_open_node_binds_table_model() {
        let console = console_with(Database::open_in_memory().unwrap(), node_tree());

        let tab = console
            .open_node("database://conn1/table1", Some("database://conn1"))
            .await
            .unwrap();

        assert_eq!(tab.page_key, DATA_VIEWER_PAGE_KEY);
        assert_eq!(tab.state, TabState::Active);
        let model = console.table_models().get(&tab.id).unwrap();
        assert_eq!(model.connection_id, "conn1");
        assert_eq!(model.container_node_id, "database://conn1/table1");
    }

    #[tokio::test]
    async fn test_reopening_node_reuses_tab() {
        let console = console_with(Database::open_in_memory().unwrap(), node_tree());

        let first = console.open_node("database://conn1/table1", None).await.unwrap();
        let other = console.open_node("database://conn2/table1", None).await.unwrap();
        let again = console.open_node("database://conn1/table1", None).await.unwrap();

        assert_eq!(first.id, again.id);
        assert_ne!(first.id, other.id);
        assert_eq!(console.tab_manager().tabs().len(), 2);
        assert_eq!(console.table_models().len(), 2);
        assert_eq!(
            console.tab_manager().get_tab(&other.id).unwrap().state,
            TabState::Background
        );
    }

    #[tokio::test]
    async fn test_node_without_data_gets_no_model() {
        let console = console_with(Database::open_in_memory().unwrap(), node_tree());

        let tab = console.open_node("database://conn1/folder", None).await.unwrap();
        assert!(!console.table_models().has(&tab.id));
    }

    #[tokio::test]
    async fn test_missing_node_surfaces_select_error() {
        let console = console_with(Database::open_in_memory().unwrap(), node_tree());

        let result = console.open_node("database://conn1/dropped", None).await;
        assert!(matches!(result, Err(CoreError::Tab(TabError::Page { .. }))));

        // The tab stays open without a table model
        let tab = console
            .tab_manager()
            .find_by_object("database://conn1/dropped")
            .unwrap();
        assert!(!console.table_models().has(&tab.id));
    }

    #[tokio::test]
    async fn test_close_connection_closes_bound_tabs() {
        let console = console_with(Database::open_in_memory().unwrap(), node_tree());
        let t1 = console.open_node("database://conn1/table1", None).await.unwrap();
        let t2 = console.open_node("database://conn2/table1", None).await.unwrap();

        let closed = console.close_connection("database://conn1").await.unwrap();

        assert_eq!(closed, vec![t1.id.clone()]);
        assert!(!console.table_models().has(&t1.id));
        assert!(console.table_models().has(&t2.id));
        assert!(console.tab_manager().get_tab(&t1.id).is_err());
    }

    #[tokio::test]
    async fn test_closing_active_tab_forgets_it() {
        let db = Database::open_in_memory().unwrap();
        let console = console_with(db.clone(), node_tree());
        let t1 = console.open_node("database://conn1/table1", None).await.unwrap();
        let t2 = console.open_node("database://conn2/table1", None).await.unwrap();

        console.close_tab(&t1.id).unwrap();
        assert_eq!(db.get_setting(ACTIVE_TAB_SETTING).unwrap(), Some(t2.id.clone()));

        console.close_tab(&t2.id).unwrap();
        assert!(db.get_setting(ACTIVE_TAB_SETTING).unwrap().is_none());
        assert!(console_with(db, node_tree()).initialize().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_restores_and_reselects() {
        let db = Database::open_in_memory().unwrap();
        let tab = {
            let console = console_with(db.clone(), node_tree());
            console.open_node("database://conn1/table1", None).await.unwrap()
        };

        let loader = node_tree();
        let console = console_with(db, loader.clone());
        let restored = console.initialize().await.unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(console.tab_manager().active_tab_id(), Some(tab.id.clone()));
        assert!(console.table_models().has(&tab.id));
        // one load for restore, one for the reselect
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn test_restore_failure_keeps_tab_for_later() {
        let db = Database::open_in_memory().unwrap();
        {
            let console = console_with(db.clone(), node_tree());
            console.open_node("database://conn1/table1", None).await.unwrap();
        }

        let loader = node_tree();
        loader.remove("database://conn1/table1");
        let console = console_with(db.clone(), loader);
        assert!(console.initialize().await.unwrap().is_empty());

        let console = console_with(db, node_tree());
        assert_eq!(console.initialize().await.unwrap().len(), 1);
    }
}
