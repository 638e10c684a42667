//! Object viewer pages
//!
//! A page is one view of an object viewer tab. Pages register a descriptor
//! with placement and lifecycle hooks; the tab manager calls the hooks of
//! the page a tab currently shows.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::HookError;
use crate::tab::Tab;

/// Lifecycle callbacks a page exposes to the tab manager
#[async_trait]
pub trait PageHooks: Send + Sync {
    /// Tab became the selected tab while showing this page
    async fn on_select(&self, tab: &Tab) -> Result<(), HookError>;

    /// Persisted tab is being reopened. `Ok(false)` drops the tab.
    async fn on_restore(&self, tab: &Tab) -> Result<bool, HookError>;

    fn on_close(&self, tab: &Tab);
}

pub struct PageDescriptor {
    pub key: String,
    /// Navigation tree the page belongs to
    pub navigator_id: String,
    pub priority: i32,
    pub order: i32,
    pub tab_component: String,
    pub panel_component: String,
    pub hooks: Arc<dyn PageHooks>,
}

impl fmt::Debug for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDescriptor")
            .field("key", &self.key)
            .field("navigator_id", &self.navigator_id)
            .field("priority", &self.priority)
            .field("order", &self.order)
            .field("tab_component", &self.tab_component)
            .field("panel_component", &self.panel_component)
            .finish_non_exhaustive()
    }
}

/// Registered page
#[derive(Debug, Clone)]
pub struct PageHandle {
    descriptor: Arc<PageDescriptor>,
}

impl PageHandle {
    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn descriptor(&self) -> &PageDescriptor {
        &self.descriptor
    }

    pub fn hooks(&self) -> Arc<dyn PageHooks> {
        Arc::clone(&self.descriptor.hooks)
    }
}

#[derive(Clone, Default)]
pub struct PageRegistry {
    pages: Arc<RwLock<HashMap<String, PageHandle>>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, descriptor: PageDescriptor) -> PageHandle {
        let handle = PageHandle {
            descriptor: Arc::new(descriptor),
        };

        let replaced = self
            .pages
            .write()
            .insert(handle.key().to_string(), handle.clone());

        if replaced.is_some() {
            tracing::warn!(page = %handle.key(), "Replaced registered page");
        } else {
            tracing::info!(
                page = %handle.key(),
                priority = handle.descriptor.priority,
                order = handle.descriptor.order,
                "Registered page"
            );
        }

        handle
    }

    pub fn get(&self, key: &str) -> Option<PageHandle> {
        self.pages.read().get(key).cloned()
    }

    /// Pages ordered by priority (highest first), then order
    pub fn pages(&self) -> Vec<PageHandle> {
        let mut pages: Vec<PageHandle> = self.pages.read().values().cloned().collect();
        pages.sort_by(|a, b| {
            b.descriptor
                .priority
                .cmp(&a.descriptor.priority)
                .then(a.descriptor.order.cmp(&b.descriptor.order))
                .then_with(|| a.key().cmp(b.key()))
        });
        pages
    }

    /// Page a freshly opened tab shows
    pub fn default_page(&self) -> Option<PageHandle> {
        self.pages().into_iter().next()
    }
}
