//! Table models
//!
//! One table model per object viewer tab, keyed by tab id.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DataViewerError;
use crate::Result;

/// Data grid session of one tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    /// Id of the owning tab
    pub id: String,
    /// Bare connection id, without the `database://` prefix
    pub connection_id: String,
    /// Node shown in the grid
    pub container_node_id: String,
    pub created_at: DateTime<Utc>,
}

/// Table models of open tabs, keyed by tab id
#[derive(Clone, Default)]
pub struct TableModelStore {
    models: Arc<RwLock<HashMap<String, TableModel>>>,
}

impl TableModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, tab_id: &str) -> bool {
        self.models.read().contains_key(tab_id)
    }

    /// Create the model for a tab.
    ///
    /// Fails with `ResourceConflict` if the tab already has one; the
    /// existing model is left untouched.
    pub fn create(&self, tab_id: &str, connection_id: &str, object_id: &str) -> Result<TableModel> {
        let mut models = self.models.write();
        if models.contains_key(tab_id) {
            return Err(DataViewerError::ResourceConflict(tab_id.to_string()));
        }

        let model = TableModel {
            id: tab_id.to_string(),
            connection_id: connection_id.to_string(),
            container_node_id: object_id.to_string(),
            created_at: Utc::now(),
        };
        models.insert(tab_id.to_string(), model.clone());

        tracing::info!(
            tab_id = %tab_id,
            connection_id = %connection_id,
            object_id = %object_id,
            "Created table model"
        );

        Ok(model)
    }

    pub fn get(&self, tab_id: &str) -> Option<TableModel> {
        self.models.read().get(tab_id).cloned()
    }

    /// Remove a model, a no-op when none exists
    pub fn remove(&self, tab_id: &str) -> Option<TableModel> {
        let removed = self.models.write().remove(tab_id);
        if removed.is_some() {
            tracing::info!(tab_id = %tab_id, "Removed table model");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    pub fn tab_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
