// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server-wide attribute-change events.
//!
//! Display-name and description changes are not routed through the
//! per-node callback records; the [`ServerEventManager`] keeps one handler
//! per node for each of the two attributes and fires it when the embedding
//! layer reports a change. [`NodeEventManager`](crate::node_events::NodeEventManager)
//! registration for these two event kinds delegates here.

use std::fmt;

use dashmap::DashMap;
use tracing::debug;

use anvil_core::{LocalizedText, NodeId};

/// Handler invoked when a node's display name changes.
pub type DisplayNameChangedHandler = Box<dyn Fn(&NodeId, &LocalizedText) + Send + Sync>;

/// Handler invoked when a node's description changes.
pub type DescriptionChangedHandler = Box<dyn Fn(&NodeId, &LocalizedText) + Send + Sync>;

/// Node-keyed registry of attribute-change handlers.
///
/// Handlers are invoked synchronously from `notify_*` and must not
/// re-register handlers from within the callback.
#[derive(Default)]
pub struct ServerEventManager {
    display_name_handlers: DashMap<NodeId, DisplayNameChangedHandler>,
    description_handlers: DashMap<NodeId, DescriptionChangedHandler>,
}

impl ServerEventManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the display-name handler for a node, replacing any
    /// previous one.
    pub fn on_display_name_changed(&self, node_id: NodeId, handler: DisplayNameChangedHandler) {
        self.display_name_handlers.insert(node_id, handler);
    }

    /// Registers the description handler for a node, replacing any
    /// previous one.
    pub fn on_description_changed(&self, node_id: NodeId, handler: DescriptionChangedHandler) {
        self.description_handlers.insert(node_id, handler);
    }

    /// Reports a display-name change. Returns `true` if a handler fired.
    pub fn notify_display_name_changed(&self, node_id: &NodeId, name: &LocalizedText) -> bool {
        match self.display_name_handlers.get(node_id) {
            Some(handler) => {
                (handler.value())(node_id, name);
                true
            }
            None => {
                debug!(node_id = %node_id, "display name change without handler");
                false
            }
        }
    }

    /// Reports a description change. Returns `true` if a handler fired.
    pub fn notify_description_changed(&self, node_id: &NodeId, description: &LocalizedText) -> bool {
        match self.description_handlers.get(node_id) {
            Some(handler) => {
                (handler.value())(node_id, description);
                true
            }
            None => false,
        }
    }

    /// Drops both handlers for a node. Called when the owning object
    /// unbinds from the address space.
    pub fn remove(&self, node_id: &NodeId) {
        self.display_name_handlers.remove(node_id);
        self.description_handlers.remove(node_id);
    }
}

impl fmt::Debug for ServerEventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerEventManager")
            .field("display_name_handlers", &self.display_name_handlers.len())
            .field("description_handlers", &self.description_handlers.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_notify_fires_registered_handler() {
        let events = ServerEventManager::new();
        let node = NodeId::numeric(2, 10);
        let fired = Arc::new(AtomicU32::new(0));

        let counter = fired.clone();
        events.on_display_name_changed(
            node.clone(),
            Box::new(move |_, text| {
                assert_eq!(text.text, "Pump 3");
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );

        assert!(events.notify_display_name_changed(&node, &LocalizedText::plain("Pump 3")));
        assert_eq!(fired.load(Ordering::Relaxed), 1);

        // Unrelated nodes and unregistered attributes stay silent.
        let other = NodeId::numeric(2, 11);
        assert!(!events.notify_display_name_changed(&other, &LocalizedText::plain("x")));
        assert!(!events.notify_description_changed(&node, &LocalizedText::plain("x")));
    }

    #[test]
    fn test_registration_replaces_previous_handler() {
        let events = ServerEventManager::new();
        let node = NodeId::numeric(2, 10);
        let fired = Arc::new(AtomicU32::new(0));

        events.on_description_changed(node.clone(), Box::new(|_, _| panic!("replaced")));
        let counter = fired.clone();
        events.on_description_changed(
            node.clone(),
            Box::new(move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );

        assert!(events.notify_description_changed(&node, &LocalizedText::plain("updated")));
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_remove_silences_node() {
        let events = ServerEventManager::new();
        let node = NodeId::numeric(2, 10);

        events.on_display_name_changed(node.clone(), Box::new(|_, _| {}));
        events.on_description_changed(node.clone(), Box::new(|_, _| {}));
        events.remove(&node);

        assert!(!events.notify_display_name_changed(&node, &LocalizedText::plain("x")));
        assert!(!events.notify_description_changed(&node, &LocalizedText::plain("x")));
    }
}
