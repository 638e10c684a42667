//! Node loading

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::NavigationError;
use crate::node::{Node, NodeContainerInfo, NodeFeature, NodeIdentity};
use crate::Result;

/// Resolves full node metadata for a node identity
#[async_trait]
pub trait NodeLoader: Send + Sync {
    async fn load(&self, identity: &NodeIdentity) -> Result<Node>;
}

/// Node tree held in memory.
///
/// Containers are derived on every load by walking the parent chain, so
/// moving a node under another connection is visible on the next load.
#[derive(Clone, Default)]
pub struct InMemoryNodeLoader {
    nodes: Arc<RwLock<HashMap<String, Node>>>,
    loads: Arc<AtomicUsize>,
}

impl InMemoryNodeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, node: Node) {
        self.nodes.write().insert(node.id.clone(), node);
    }

    pub fn remove(&self, node_id: &str) -> Option<Node> {
        self.nodes.write().remove(node_id)
    }

    /// Number of successful and failed loads served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn resolve_container(nodes: &HashMap<String, Node>, node: &Node) -> NodeContainerInfo {
        let mut info = NodeContainerInfo::default();
        let mut visited = HashSet::new();
        let mut current = Some(node);

        while let Some(n) = current {
            if !visited.insert(n.id.as_str()) {
                tracing::warn!(node_id = %node.id, "Cycle in node ancestry");
                break;
            }

            if info.connection_id.is_none() && n.has_feature(NodeFeature::Connection) {
                info.connection_id = Some(n.id.clone());
            }
            if info.catalog_id.is_none() && n.has_feature(NodeFeature::Catalog) {
                info.catalog_id = Some(n.id.clone());
            }
            if info.schema_id.is_none() && n.has_feature(NodeFeature::Schema) {
                info.schema_id = Some(n.id.clone());
            }

            current = n.parent_id.as_deref().and_then(|id| nodes.get(id));
        }

        info
    }
}

#[async_trait]
impl NodeLoader for InMemoryNodeLoader {
    async fn load(&self, identity: &NodeIdentity) -> Result<Node> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let loaded = {
            let nodes = self.nodes.read();
            let node = nodes
                .get(&identity.node_id)
                .ok_or_else(|| NavigationError::NodeNotFound(identity.node_id.clone()))?;

            let mut loaded = node.clone();
            loaded.container = Self::resolve_container(&nodes, node);
            loaded
        };

        tracing::debug!(
            node_id = %loaded.id,
            connection_id = ?loaded.container.connection_id,
            "Loaded node"
        );

        Ok(loaded)
    }
}
