//! Tab data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dbconsole_navigation::NodeIdentity;
use dbconsole_storage::TabRecord;

use crate::error::TabError;
use crate::state::TabState;
use crate::Result;

/// The node an object viewer tab was opened for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerState {
    pub object_id: String,
    pub parent_id: Option<String>,
}

impl HandlerState {
    pub fn node_identity(&self) -> NodeIdentity {
        NodeIdentity::new(self.object_id.clone(), self.parent_id.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Page currently shown in the tab
    pub page_key: String,
    pub handler_state: HandlerState,
    /// Current state in the state machine
    pub state: TabState,
    /// Position in the tab strip
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_selected_at: Option<DateTime<Utc>>,
}

impl Tab {
    pub fn new(page_key: String, object_id: String, parent_id: Option<String>) -> Result<Self> {
        if object_id.is_empty() {
            return Err(TabError::InvalidObject(
                "object id cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            page_key,
            handler_state: HandlerState {
                object_id,
                parent_id,
            },
            state: TabState::Background,
            position: 0,
            created_at: now,
            updated_at: now,
            last_selected_at: None,
        })
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: TabState) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            tab_id = %self.id,
            from = %self.state,
            to = %new_state,
            "Tab state transition"
        );

        self.state = new_state;
        self.updated_at = Utc::now();

        if new_state == TabState::Active {
            self.last_selected_at = Some(self.updated_at);
        }

        Ok(())
    }

    /// Mark tab as selected
    pub fn activate(&mut self) -> Result<()> {
        self.transition_to(TabState::Active)
    }

    pub fn blur(&mut self) -> Result<()> {
        if self.state == TabState::Active {
            self.transition_to(TabState::Background)
        } else {
            Ok(())
        }
    }

    /// Page accepted the persisted tab
    pub fn mark_restored(&mut self) -> Result<()> {
        if self.state == TabState::Unloaded {
            self.transition_to(TabState::Background)
        } else {
            Ok(())
        }
    }

    pub fn switch_page(&mut self, page_key: String) {
        self.page_key = page_key;
        self.updated_at = Utc::now();
    }

    pub fn object_id(&self) -> &str {
        &self.handler_state.object_id
    }

    pub(crate) fn to_record(&self) -> TabRecord {
        TabRecord {
            id: self.id.clone(),
            page_key: self.page_key.clone(),
            object_id: self.handler_state.object_id.clone(),
            parent_id: self.handler_state.parent_id.clone(),
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_selected_at: self.last_selected_at,
        }
    }
}

/// Persisted tabs come back unloaded until a page accepts them
impl From<TabRecord> for Tab {
    fn from(record: TabRecord) -> Self {
        Self {
            id: record.id,
            page_key: record.page_key,
            handler_state: HandlerState {
                object_id: record.object_id,
                parent_id: record.parent_id,
            },
            state: TabState::Unloaded,
            position: record.position,
            created_at: record.created_at,
            updated_at: record.updated_at,
            last_selected_at: record.last_selected_at,
        }
    }
}
