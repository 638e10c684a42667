//! Navigation tree nodes
//!
//! A node is an entry of the database object tree: a connection, catalog,
//! schema, folder or a data container such as a table or view.

use serde::{Deserialize, Serialize};

/// Prefix of connection node ids, e.g. `database://local-pg`
pub const CONNECTION_NODE_PREFIX: &str = "database://";

/// Strip the connection node prefix, yielding the bare connection id.
/// Ids without the prefix are returned unchanged.
pub fn connection_node_id_to_connection_id(node_id: &str) -> &str {
    node_id
        .strip_prefix(CONNECTION_NODE_PREFIX)
        .unwrap_or(node_id)
}

pub fn connection_id_to_node_id(connection_id: &str) -> String {
    format!("{}{}", CONNECTION_NODE_PREFIX, connection_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeFeature {
    /// Root of a database connection
    Connection,
    Catalog,
    Schema,
    /// Plain grouping node
    Folder,
    /// Node whose rows can be shown in a data grid (table, view)
    DataContainer,
}

/// Identity used to request a node from a loader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub node_id: String,
    pub parent_id: Option<String>,
}

impl NodeIdentity {
    pub fn new(node_id: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            node_id: node_id.into(),
            parent_id,
        }
    }
}

/// Containers a node lives in, derived from its ancestry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerInfo {
    /// Connection node id (`database://...`), not the bare connection id
    pub connection_id: Option<String>,
    pub catalog_id: Option<String>,
    pub schema_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub features: Vec<NodeFeature>,
    /// Filled in by the loader
    #[serde(default)]
    pub container: NodeContainerInfo,
}

impl Node {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            name: name.into(),
            features: Vec::new(),
            container: NodeContainerInfo::default(),
        }
    }

    pub fn with_feature(mut self, feature: NodeFeature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    pub fn has_feature(&self, feature: NodeFeature) -> bool {
        self.features.contains(&feature)
    }

    /// True when the node can be opened in the data viewer
    pub fn has_data(&self) -> bool {
        self.has_feature(NodeFeature::DataContainer)
    }

    pub fn container_info(&self) -> &NodeContainerInfo {
        &self.container
    }

    pub fn identity(&self) -> NodeIdentity {
        NodeIdentity::new(self.id.clone(), self.parent_id.clone())
    }
}
