//! Navigation event bus
//!
//! Handlers are registered once and receive every navigation event. A
//! registration removes its handler when disposed or dropped.

use async_trait::async_trait;
use futures_util::future::join_all;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::event::NavigationEvent;

type HandlerTable = RwLock<Vec<(u64, Arc<dyn NavigationHandler>)>>;

#[async_trait]
pub trait NavigationHandler: Send + Sync {
    /// Handlers contain their own failures; the bus never sees them.
    async fn handle(&self, event: &NavigationEvent);
}

#[derive(Clone, Default)]
pub struct Navigator {
    handlers: Arc<HandlerTable>,
    next_id: Arc<AtomicU64>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&self, handler: Arc<dyn NavigationHandler>) -> HandlerRegistration {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers.write().push((id, handler));

        tracing::debug!(handler_id = id, "Registered navigation handler");

        HandlerRegistration {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Dispatch an event to every handler and wait for all of them
    pub async fn navigate(&self, event: NavigationEvent) {
        let handlers: Vec<Arc<dyn NavigationHandler>> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::debug!(
            node_id = %event.node_info.node_id,
            navigation_type = ?event.node_info.navigation_type,
            handlers = handlers.len(),
            "Dispatching navigation event"
        );

        join_all(handlers.iter().map(|handler| handler.handle(&event))).await;
    }
}

/// Keeps a handler registered until disposed or dropped
#[must_use = "dropping the registration removes the handler"]
pub struct HandlerRegistration {
    id: u64,
    handlers: Weak<HandlerTable>,
}

impl HandlerRegistration {
    pub fn dispose(self) {}
}

impl Drop for HandlerRegistration {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            handlers.write().retain(|(id, _)| *id != self.id);
            tracing::debug!(handler_id = self.id, "Removed navigation handler");
        }
    }
}
