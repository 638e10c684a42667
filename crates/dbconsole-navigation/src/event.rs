//! Navigation events
//!
//! Raised by the navigation tree when the user focuses a node. Events that
//! target an object viewer tab carry the tab info and a page switcher so
//! handlers can move the tab to their own page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::NavigationError;
use crate::node::NodeIdentity;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationType {
    #[default]
    Open,
    /// The connection owning the node is being closed
    CloseConnection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeNavigationData {
    pub node_id: String,
    pub parent_id: Option<String>,
    pub navigation_type: NavigationType,
}

impl NodeNavigationData {
    pub fn open(node_id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            node_id: node_id.into(),
            parent_id: parent_id.map(str::to_string),
            navigation_type: NavigationType::Open,
        }
    }

    pub fn close_connection(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            parent_id: None,
            navigation_type: NavigationType::CloseConnection,
        }
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::new(self.node_id.clone(), self.parent_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabNavigationInfo {
    pub tab_id: String,
    /// First visit of the tab rather than a switch to an existing one
    pub is_newly_created: bool,
}

/// Switches the page shown by the tab an event targets
pub trait PageSwitcher: Send + Sync {
    /// Returns false when the page is unknown or the tab is gone
    fn try_switch_page(&self, page_key: &str) -> bool;
}

#[derive(Clone)]
pub struct NavigationEvent {
    pub node_info: NodeNavigationData,
    tab: Option<(TabNavigationInfo, Arc<dyn PageSwitcher>)>,
}

impl NavigationEvent {
    pub fn new(node_info: NodeNavigationData) -> Self {
        Self {
            node_info,
            tab: None,
        }
    }

    pub fn with_tab(mut self, tab_info: TabNavigationInfo, switcher: Arc<dyn PageSwitcher>) -> Self {
        self.tab = Some((tab_info, switcher));
        self
    }

    pub fn tab_info(&self) -> Option<&TabNavigationInfo> {
        self.tab.as_ref().map(|(info, _)| info)
    }

    /// Resolve the object viewer context of this event
    pub fn object_viewer_context(&self) -> Result<ObjectViewerContext<'_>> {
        let (tab_info, switcher) = self
            .tab
            .as_ref()
            .ok_or(NavigationError::MissingContext("object viewer tab"))?;

        Ok(ObjectViewerContext {
            node_info: &self.node_info,
            tab_info,
            switcher: switcher.as_ref(),
        })
    }
}

impl fmt::Debug for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationEvent")
            .field("node_info", &self.node_info)
            .field("tab_info", &self.tab_info())
            .finish()
    }
}

pub struct ObjectViewerContext<'a> {
    pub node_info: &'a NodeNavigationData,
    pub tab_info: &'a TabNavigationInfo,
    switcher: &'a dyn PageSwitcher,
}

impl ObjectViewerContext<'_> {
    pub fn try_switch_page(&self, page_key: &str) -> bool {
        self.switcher.try_switch_page(page_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSwitcher {
        pages: Mutex<Vec<String>>,
    }

    impl PageSwitcher for RecordingSwitcher {
        fn try_switch_page(&self, page_key: &str) -> bool {
            self.pages.lock().push(page_key.to_string());
            true
        }
    }

    #[test]
    fn test_context_requires_tab() {
        let event = NavigationEvent::new(NodeNavigationData::open("db/conn1", None));
        assert!(matches!(
            event.object_viewer_context(),
            Err(NavigationError::MissingContext(_))
        ));
    }

    #[test]
    fn test_context_switches_page() {
        let switcher = Arc::new(RecordingSwitcher::default());
        let event = NavigationEvent::new(NodeNavigationData::open("db/conn1/t1", Some("db/conn1")))
            .with_tab(
                TabNavigationInfo {
                    tab_id: "tab-1".to_string(),
                    is_newly_created: true,
                },
                switcher.clone(),
            );

        let context = event.object_viewer_context().unwrap();
        assert!(context.tab_info.is_newly_created);
        assert!(context.try_switch_page("data-viewer"));
        assert_eq!(*switcher.pages.lock(), vec!["data-viewer".to_string()]);
    }
}
