//! Tab Manager
//!
//! Owns the object viewer tabs, persists them, and raises page hooks.
//! Locks are released before any hook is awaited.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use dbconsole_navigation::PageSwitcher;
use dbconsole_storage::Database;

use crate::error::TabError;
use crate::page::{PageHandle, PageRegistry};
use crate::tab::Tab;
use crate::Result;

pub struct TabManager {
    /// In-memory tab cache
    tabs: Arc<RwLock<HashMap<String, Tab>>>,
    active_tab_id: Arc<RwLock<Option<String>>>,
    pages: PageRegistry,
    /// Database for persistence
    db: Database,
}

impl TabManager {
    pub fn new(db: Database, pages: PageRegistry) -> Self {
        Self {
            tabs: Arc::new(RwLock::new(HashMap::new())),
            active_tab_id: Arc::new(RwLock::new(None)),
            pages,
            db,
        }
    }

    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    /// Open a tab for a node on the default page
    pub fn open_tab(&self, object_id: String, parent_id: Option<String>) -> Result<Tab> {
        let page = self
            .pages
            .default_page()
            .ok_or_else(|| TabError::PageNotFound("<default>".to_string()))?;

        let mut tab = Tab::new(page.key().to_string(), object_id, parent_id)?;
        tab.position = self.next_position();

        self.db.save_tab(&tab.to_record())?;
        self.tabs.write().insert(tab.id.clone(), tab.clone());

        tracing::info!(
            tab_id = %tab.id,
            object_id = %tab.handler_state.object_id,
            page = %tab.page_key,
            "Opened tab"
        );

        Ok(tab)
    }

    /// Get a tab by ID
    pub fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.tabs
            .read()
            .get(tab_id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// Open tabs in strip order
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs: Vec<Tab> = self.tabs.read().values().cloned().collect();
        tabs.sort_by_key(|t| t.position);
        tabs
    }

    pub fn active_tab_id(&self) -> Option<String> {
        self.active_tab_id.read().clone()
    }

    /// Find the open tab showing a node
    pub fn find_by_object(&self, object_id: &str) -> Option<Tab> {
        self.tabs()
            .into_iter()
            .find(|t| t.handler_state.object_id == object_id)
    }

    fn update_tab(&self, tab: &Tab) -> Result<()> {
        self.db.save_tab(&tab.to_record())?;
        self.tabs.write().insert(tab.id.clone(), tab.clone());
        Ok(())
    }

    pub fn switch_page(&self, tab_id: &str, page_key: &str) -> Result<Tab> {
        if self.pages.get(page_key).is_none() {
            return Err(TabError::PageNotFound(page_key.to_string()));
        }

        let mut tab = self.get_tab(tab_id)?;
        if tab.page_key != page_key {
            tracing::debug!(tab_id = %tab_id, from = %tab.page_key, to = %page_key, "Switching page");
            tab.switch_page(page_key.to_string());
            self.update_tab(&tab)?;
        }
        Ok(tab)
    }

    /// Page switcher bound to one tab, handed to navigation events
    pub fn switcher(&self, tab_id: &str) -> Arc<dyn PageSwitcher> {
        Arc::new(TabPageSwitcher {
            manager: self.clone(),
            tab_id: tab_id.to_string(),
        })
    }

    /// Select a tab and run its page's select hook
    pub async fn select_tab(&self, tab_id: &str) -> Result<Tab> {
        let mut tab = self.get_tab(tab_id)?;
        tab.activate()?;

        let previous = self.active_tab_id.write().replace(tab.id.clone());
        if let Some(previous_id) = previous.filter(|id| id != tab_id) {
            if let Ok(mut previous_tab) = self.get_tab(&previous_id) {
                let _ = previous_tab.blur().and_then(|_| self.update_tab(&previous_tab));
            }
        }
        self.update_tab(&tab)?;

        let page = self.page_for(&tab)?;
        page.hooks().on_select(&tab).await.map_err(|source| {
            tracing::error!(
                tab_id = %tab.id,
                page = %page.key(),
                error = %source,
                "Tab failed to load"
            );
            TabError::Page {
                page: page.key().to_string(),
                tab_id: tab.id.clone(),
                source,
            }
        })?;

        Ok(tab)
    }

    /// Reopen persisted tabs that every registered page accepts.
    ///
    /// A tab any page declines is deleted. A tab whose restore fails on any
    /// page stays persisted for the next start but is not opened. Either way
    /// every page is told to release the tab.
    pub async fn restore_tabs(&self) -> Result<Vec<Tab>> {
        let persisted: Vec<Tab> = self.db.load_tabs()?.into_iter().map(Tab::from).collect();
        let pages = self.pages.pages();
        let mut restored = Vec::new();

        for mut tab in persisted {
            if self.pages.get(&tab.page_key).is_none() {
                tracing::warn!(tab_id = %tab.id, page = %tab.page_key, "Dropping tab of unknown page");
                self.db.delete_tab(&tab.id)?;
                continue;
            }

            let mut declined = false;
            let mut failed = false;
            for page in &pages {
                match page.hooks().on_restore(&tab).await {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::info!(tab_id = %tab.id, page = %page.key(), "Page declined tab restore");
                        declined = true;
                    }
                    Err(e) => {
                        tracing::error!(tab_id = %tab.id, page = %page.key(), error = %e, "Tab restore failed");
                        failed = true;
                    }
                }
            }

            if declined || failed {
                for page in &pages {
                    page.hooks().on_close(&tab);
                }
                if declined {
                    self.db.delete_tab(&tab.id)?;
                }
                continue;
            }

            tab.mark_restored()?;
            self.update_tab(&tab)?;
            restored.push(tab);
        }

        tracing::info!(count = restored.len(), "Restored tabs");

        Ok(restored)
    }

    /// Close a tab, releasing whatever any page holds for it
    pub fn close_tab(&self, tab_id: &str) -> Result<()> {
        let tab = self.get_tab(tab_id)?;

        // A tab may have been bound on a page it no longer shows
        for page in self.pages.pages() {
            page.hooks().on_close(&tab);
        }

        self.db.delete_tab(tab_id)?;
        self.tabs.write().remove(tab_id);

        {
            let mut active = self.active_tab_id.write();
            if active.as_deref() == Some(tab_id) {
                *active = None;
            }
        }

        tracing::info!(tab_id = %tab_id, "Closed tab");

        Ok(())
    }

    fn page_for(&self, tab: &Tab) -> Result<PageHandle> {
        self.pages
            .get(&tab.page_key)
            .ok_or_else(|| TabError::PageNotFound(tab.page_key.clone()))
    }

    fn next_position(&self) -> i64 {
        self.tabs
            .read()
            .values()
            .map(|t| t.position + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            tabs: Arc::clone(&self.tabs),
            active_tab_id: Arc::clone(&self.active_tab_id),
            pages: self.pages.clone(),
            db: self.db.clone(),
        }
    }
}

struct TabPageSwitcher {
    manager: TabManager,
    tab_id: String,
}

impl PageSwitcher for TabPageSwitcher {
    fn try_switch_page(&self, page_key: &str) -> bool {
        match self.manager.switch_page(&self.tab_id, page_key) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(tab_id = %self.tab_id, page = %page_key, error = %e, "Page switch refused");
                false
            }
        }
    }
}
