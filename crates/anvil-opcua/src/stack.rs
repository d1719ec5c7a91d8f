// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Protocol stack contract.
//!
//! The underlying OPC UA stack (node tree, encoding, transport, session
//! lifecycle) is a black box to this crate. This module pins down the
//! contract the dispatch layer consumes from it:
//!
//! - a per-node opaque context slot, holding a weak handle to the owning
//!   application object
//! - a combined read/write callback record for variable-value events and
//!   another for data-source events (both directions live in one record,
//!   so installing one side must preserve the other)
//! - a single method-callback slot per method node
//!
//! During dispatch the stack hands the registered callback an event
//! context carrying the server handle, the calling session, and the
//! kind-specific payload. Callbacks are plain `fn` pointers with no
//! captured state; per-node behavior is recovered from the context slot
//! (see [`crate::node_events`]).
//!
//! [`MemoryAddressSpace`] is a reference implementation backing the test
//! suites and in-process embeddings.

use std::sync::{Arc, Weak};

use dashmap::DashMap;

use anvil_core::{DataValue, NodeId, NumericRange, Permission, StatusCode, Variant};

use crate::node_events::NodeEventManager;
use crate::server::UaServer;
use crate::session::Session;

// =============================================================================
// NodeOwner
// =============================================================================

/// An application object bound into the address space.
///
/// One object may own several nodes (an object node, its variables, its
/// methods) and delegates per-node events to the matching
/// [`NodeEventManager`]. The object also answers permission questions for
/// the nodes it owns; method dispatch consults it before invoking any
/// handler.
pub trait NodeOwner: Send + Sync {
    /// Resolves the event manager responsible for one of this object's
    /// nodes. Returns `None` for nodes this object does not manage.
    fn event_manager(&self, node_id: &NodeId) -> Option<Arc<NodeEventManager>>;

    /// Returns `true` if `session` holds `permission` on `node_id`.
    fn check_permission(&self, permission: Permission, node_id: &NodeId, session: &Session)
        -> bool;
}

/// The opaque per-node context stored in the stack.
///
/// Weak by design: the stack's context slot must never keep an
/// application object alive, and dispatch after the owner is dropped
/// degrades to the context-resolution failure path.
pub type ObjectRef = Weak<dyn NodeOwner>;

// =============================================================================
// Event contexts
// =============================================================================

/// Context for a variable-value read or write notification.
pub struct ValueEvent<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when the stack can supply it.
    pub session: Option<&'a Arc<Session>>,
    /// The node being read or written.
    pub node_id: &'a NodeId,
    /// The node's context slot content.
    pub node_context: Option<&'a ObjectRef>,
    /// Index range of a partial access, if any.
    pub range: Option<&'a NumericRange>,
    /// The value being read or written.
    pub value: &'a DataValue,
}

/// Context for a data-source read: the handler produces the value.
pub struct DataSourceReadEvent<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when the stack can supply it.
    pub session: Option<&'a Arc<Session>>,
    /// The node being read.
    pub node_id: &'a NodeId,
    /// The node's context slot content.
    pub node_context: Option<&'a ObjectRef>,
    /// Whether the reply must carry a source timestamp.
    pub include_source_timestamp: bool,
    /// Index range of a partial access, if any.
    pub range: Option<&'a NumericRange>,
    /// Out parameter: the handler fills this in.
    pub value: &'a mut DataValue,
}

/// Context for a data-source write.
pub struct DataSourceWriteEvent<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when the stack can supply it.
    pub session: Option<&'a Arc<Session>>,
    /// The node being written.
    pub node_id: &'a NodeId,
    /// The node's context slot content.
    pub node_context: Option<&'a ObjectRef>,
    /// Index range of a partial access, if any.
    pub range: Option<&'a NumericRange>,
    /// The value to store.
    pub value: &'a DataValue,
}

/// Context for a method invocation.
pub struct MethodEvent<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, used for the Execute permission check.
    pub session: Option<&'a Arc<Session>>,
    /// The method node.
    pub method_id: &'a NodeId,
    /// The method node's context slot content.
    pub method_context: Option<&'a ObjectRef>,
    /// The object node the method is invoked on.
    pub object_id: &'a NodeId,
    /// The object node's context slot content.
    pub object_context: Option<&'a ObjectRef>,
    /// Input arguments supplied by the client.
    pub inputs: &'a [Variant],
    /// Out parameter: output arguments produced by the handler.
    pub outputs: &'a mut Vec<Variant>,
}

// =============================================================================
// Callback records
// =============================================================================

/// A value-event callback. Fixed signature, no captured state.
pub type ValueCallback = fn(&ValueEvent<'_>);

/// A data-source read callback.
pub type DataSourceReadCallback = fn(&mut DataSourceReadEvent<'_>) -> StatusCode;

/// A data-source write callback.
pub type DataSourceWriteCallback = fn(&DataSourceWriteEvent<'_>) -> StatusCode;

/// A method callback.
pub type MethodCallback = fn(&mut MethodEvent<'_>) -> StatusCode;

/// The combined value-callback record of one node.
///
/// Both directions live in one record. Installing one side requires a
/// read-modify-write so the sibling survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCallbacks {
    /// Invoked after the stack has read the node's cached value.
    pub on_read: Option<ValueCallback>,
    /// Invoked after a client write has passed stack-level validation.
    pub on_write: Option<ValueCallback>,
}

/// The combined data-source record of one node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSourceCallbacks {
    /// Produces the node's value on demand.
    pub read: Option<DataSourceReadCallback>,
    /// Consumes a written value.
    pub write: Option<DataSourceWriteCallback>,
}

// =============================================================================
// AddressSpace
// =============================================================================

/// The slice of the protocol stack this layer depends on.
///
/// Implementations must tolerate unknown node ids: getters return the
/// empty record / `None`, setters create the slot.
pub trait AddressSpace: Send + Sync {
    /// Stores (or clears, with `None`) a node's opaque context.
    fn set_node_context(&self, node_id: &NodeId, context: Option<ObjectRef>);

    /// Returns a node's opaque context, if set.
    fn node_context(&self, node_id: &NodeId) -> Option<ObjectRef>;

    /// Returns a node's combined value-callback record.
    fn value_callbacks(&self, node_id: &NodeId) -> ValueCallbacks;

    /// Replaces a node's combined value-callback record.
    fn set_value_callbacks(&self, node_id: &NodeId, callbacks: ValueCallbacks);

    /// Returns a node's combined data-source record.
    fn data_source_callbacks(&self, node_id: &NodeId) -> DataSourceCallbacks;

    /// Replaces a node's combined data-source record.
    fn set_data_source_callbacks(&self, node_id: &NodeId, callbacks: DataSourceCallbacks);

    /// Returns a method node's callback, if set.
    fn method_callback(&self, node_id: &NodeId) -> Option<MethodCallback>;

    /// Sets (or clears, with `None`) a method node's callback.
    fn set_method_callback(&self, node_id: &NodeId, callback: Option<MethodCallback>);
}

// =============================================================================
// MemoryAddressSpace
// =============================================================================

/// In-memory [`AddressSpace`] implementation.
///
/// Backs the test suites; also usable by in-process embeddings that drive
/// dispatch themselves.
#[derive(Debug, Default)]
pub struct MemoryAddressSpace {
    contexts: DashMap<NodeId, ObjectRef>,
    value_callbacks: DashMap<NodeId, ValueCallbacks>,
    data_source_callbacks: DashMap<NodeId, DataSourceCallbacks>,
    method_callbacks: DashMap<NodeId, MethodCallback>,
}

impl MemoryAddressSpace {
    /// Creates an empty address space.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AddressSpace for MemoryAddressSpace {
    fn set_node_context(&self, node_id: &NodeId, context: Option<ObjectRef>) {
        match context {
            Some(context) => {
                self.contexts.insert(node_id.clone(), context);
            }
            None => {
                self.contexts.remove(node_id);
            }
        }
    }

    fn node_context(&self, node_id: &NodeId) -> Option<ObjectRef> {
        self.contexts.get(node_id).map(|entry| entry.value().clone())
    }

    fn value_callbacks(&self, node_id: &NodeId) -> ValueCallbacks {
        self.value_callbacks
            .get(node_id)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    fn set_value_callbacks(&self, node_id: &NodeId, callbacks: ValueCallbacks) {
        self.value_callbacks.insert(node_id.clone(), callbacks);
    }

    fn data_source_callbacks(&self, node_id: &NodeId) -> DataSourceCallbacks {
        self.data_source_callbacks
            .get(node_id)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    fn set_data_source_callbacks(&self, node_id: &NodeId, callbacks: DataSourceCallbacks) {
        self.data_source_callbacks.insert(node_id.clone(), callbacks);
    }

    fn method_callback(&self, node_id: &NodeId) -> Option<MethodCallback> {
        self.method_callbacks.get(node_id).map(|entry| *entry)
    }

    fn set_method_callback(&self, node_id: &NodeId, callback: Option<MethodCallback>) {
        match callback {
            Some(callback) => {
                self.method_callbacks.insert(node_id.clone(), callback);
            }
            None => {
                self.method_callbacks.remove(node_id);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
