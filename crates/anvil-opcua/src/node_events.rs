// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-node event registration and dispatch.
//!
//! A [`NodeEventManager`] binds one node to its owning application object
//! and carries the handlers for that node's events. Registration is
//! per-kind and opt-in: installing a handler also installs the matching
//! trampoline into the stack's callback record, preserving whichever
//! sibling callback was already there.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐ fixed-signature ┌─────────────────────┐
//! │ protocol stack │────callbacks───▶│  trampoline          │
//! │ (black box)    │                 │  context ──▶ owner   │
//! └────────────────┘                 │  owner ──▶ manager   │
//!                                    │  permission check    │
//!                                    └─────────┬───────────┘
//!                                              │ typed args
//!                                    ┌─────────▼───────────┐
//!                                    │ registered handler   │
//!                                    └─────────────────────┘
//! ```
//!
//! The trampolines are plain `fn` items: the stack interface offers no
//! captured state, so per-node behavior is recovered by upgrading the
//! node's context slot to the owning [`NodeOwner`] and asking it for the
//! manager of the concrete node id. A dead or missing context makes
//! value-style dispatch return silently and status-style dispatch return
//! [`StatusCode::BAD_INTERNAL_ERROR`]; both indicate a binding bug, not a
//! transient condition.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use anvil_core::{DataValue, NodeId, NumericRange, Permission, StatusCode, Variant};

use crate::server::UaServer;
use crate::session::Session;
use crate::stack::{
    DataSourceReadEvent, DataSourceWriteEvent, MethodEvent, NodeOwner, ObjectRef, ValueEvent,
};

// =============================================================================
// Handler argument bundles
// =============================================================================

/// Arguments delivered to a read handler.
pub struct ReadArgs<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when available.
    pub session: Option<&'a Arc<Session>>,
    /// The node that was read.
    pub node_id: &'a NodeId,
    /// Index range of a partial read, if any.
    pub range: Option<&'a NumericRange>,
    /// The value the stack returned to the client.
    pub value: &'a DataValue,
}

/// Arguments delivered to a write handler.
pub struct WriteArgs<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when available.
    pub session: Option<&'a Arc<Session>>,
    /// The node that was written.
    pub node_id: &'a NodeId,
    /// Index range of a partial write, if any.
    pub range: Option<&'a NumericRange>,
    /// The value the client wrote.
    pub value: &'a DataValue,
}

/// Arguments delivered to a data-source read handler.
pub struct DataSourceReadArgs<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when available.
    pub session: Option<&'a Arc<Session>>,
    /// The node being read.
    pub node_id: &'a NodeId,
    /// Whether the produced value must carry a source timestamp.
    pub include_source_timestamp: bool,
    /// Index range of a partial read, if any.
    pub range: Option<&'a NumericRange>,
    /// Out parameter: the handler stores the produced value here.
    pub value: &'a mut DataValue,
}

/// Arguments delivered to a data-source write handler.
pub struct DataSourceWriteArgs<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session, when available.
    pub session: Option<&'a Arc<Session>>,
    /// The node being written.
    pub node_id: &'a NodeId,
    /// Index range of a partial write, if any.
    pub range: Option<&'a NumericRange>,
    /// The value to store.
    pub value: &'a DataValue,
}

/// Arguments delivered to a method handler.
pub struct MethodArgs<'a> {
    /// The server handle.
    pub server: &'a Arc<UaServer>,
    /// Identifier of the calling session.
    pub session_id: &'a NodeId,
    /// The calling session. Present: permission checking already required it.
    pub session: Option<&'a Arc<Session>>,
    /// The method node.
    pub method_id: &'a NodeId,
    /// The object node the method is invoked on.
    pub object_id: &'a NodeId,
    /// Input arguments supplied by the client.
    pub inputs: &'a [Variant],
    /// Out parameter: output arguments to return to the client.
    pub outputs: &'a mut Vec<Variant>,
}

/// Handler for value reads.
pub type ReadHandler = Box<dyn Fn(ReadArgs<'_>) + Send + Sync>;

/// Handler for value writes.
pub type WriteHandler = Box<dyn Fn(WriteArgs<'_>) + Send + Sync>;

/// Handler for data-source reads. The returned status is propagated to
/// the stack verbatim.
pub type DataSourceReadHandler = Box<dyn Fn(DataSourceReadArgs<'_>) -> StatusCode + Send + Sync>;

/// Handler for data-source writes. The returned status is propagated to
/// the stack verbatim.
pub type DataSourceWriteHandler = Box<dyn Fn(DataSourceWriteArgs<'_>) -> StatusCode + Send + Sync>;

/// Handler for method invocations. The returned status is propagated to
/// the stack verbatim.
pub type MethodHandler = Box<dyn Fn(MethodArgs<'_>) -> StatusCode + Send + Sync>;

// =============================================================================
// NodeEventManager
// =============================================================================

/// Event registration point for one node.
///
/// Created when an application object is bound to a node; construction
/// writes the owner's [`ObjectRef`] into the stack's per-node context
/// slot, which is what dispatch later resolves back through. The owning
/// object must instruct the stack to drop the node's callback hooks
/// before dropping the manager.
///
/// Handler slots are written during (single-threaded) node setup and only
/// read afterwards; each registration replaces a previous handler of the
/// same kind.
pub struct NodeEventManager {
    node_id: NodeId,
    server: Arc<UaServer>,
    read_handler: RwLock<Option<ReadHandler>>,
    write_handler: RwLock<Option<WriteHandler>>,
    data_source_read_handler: RwLock<Option<DataSourceReadHandler>>,
    data_source_write_handler: RwLock<Option<DataSourceWriteHandler>>,
    method_handler: RwLock<Option<MethodHandler>>,
}

impl NodeEventManager {
    /// Binds `owner` to `node_id` and returns the node's event manager.
    pub fn new(node_id: NodeId, server: Arc<UaServer>, owner: ObjectRef) -> Arc<Self> {
        server.address_space().set_node_context(&node_id, Some(owner));
        Arc::new(Self {
            node_id,
            server,
            read_handler: RwLock::new(None),
            write_handler: RwLock::new(None),
            data_source_read_handler: RwLock::new(None),
            data_source_write_handler: RwLock::new(None),
            method_handler: RwLock::new(None),
        })
    }

    /// Returns the managed node id.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Registers the read handler and installs the read trampoline,
    /// preserving an already-installed write callback.
    pub fn on_read(&self, handler: impl Fn(ReadArgs<'_>) + Send + Sync + 'static) {
        *self.read_handler.write() = Some(Box::new(handler));

        let space = self.server.address_space();
        let mut callbacks = space.value_callbacks(&self.node_id);
        callbacks.on_read = Some(trampoline::value_read);
        space.set_value_callbacks(&self.node_id, callbacks);
    }

    /// Registers the write handler and installs the write trampoline,
    /// preserving an already-installed read callback.
    pub fn on_write(&self, handler: impl Fn(WriteArgs<'_>) + Send + Sync + 'static) {
        *self.write_handler.write() = Some(Box::new(handler));

        let space = self.server.address_space();
        let mut callbacks = space.value_callbacks(&self.node_id);
        callbacks.on_write = Some(trampoline::value_write);
        space.set_value_callbacks(&self.node_id, callbacks);
    }

    /// Registers the data-source read handler, preserving the data-source
    /// write side of the record.
    pub fn on_data_source_read(
        &self,
        handler: impl Fn(DataSourceReadArgs<'_>) -> StatusCode + Send + Sync + 'static,
    ) {
        *self.data_source_read_handler.write() = Some(Box::new(handler));

        let space = self.server.address_space();
        let mut callbacks = space.data_source_callbacks(&self.node_id);
        callbacks.read = Some(trampoline::data_source_read);
        space.set_data_source_callbacks(&self.node_id, callbacks);
    }

    /// Registers the data-source write handler, preserving the data-source
    /// read side of the record.
    pub fn on_data_source_write(
        &self,
        handler: impl Fn(DataSourceWriteArgs<'_>) -> StatusCode + Send + Sync + 'static,
    ) {
        *self.data_source_write_handler.write() = Some(Box::new(handler));

        let space = self.server.address_space();
        let mut callbacks = space.data_source_callbacks(&self.node_id);
        callbacks.write = Some(trampoline::data_source_write);
        space.set_data_source_callbacks(&self.node_id, callbacks);
    }

    /// Registers the method handler. Methods have a single callback slot,
    /// so no read-modify-write is needed.
    pub fn on_method_call(
        &self,
        handler: impl Fn(MethodArgs<'_>) -> StatusCode + Send + Sync + 'static,
    ) {
        *self.method_handler.write() = Some(Box::new(handler));

        self.server
            .address_space()
            .set_method_callback(&self.node_id, Some(trampoline::method_call));
    }

    /// Registers a display-name change handler for this node via the
    /// server-wide event manager.
    pub fn on_display_name_changed(
        &self,
        handler: impl Fn(&NodeId, &anvil_core::LocalizedText) + Send + Sync + 'static,
    ) {
        self.server
            .event_manager()
            .on_display_name_changed(self.node_id.clone(), Box::new(handler));
    }

    /// Registers a description change handler for this node via the
    /// server-wide event manager.
    pub fn on_description_changed(
        &self,
        handler: impl Fn(&NodeId, &anvil_core::LocalizedText) + Send + Sync + 'static,
    ) {
        self.server
            .event_manager()
            .on_description_changed(self.node_id.clone(), Box::new(handler));
    }
}

impl std::fmt::Debug for NodeEventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeEventManager")
            .field("node_id", &self.node_id)
            .field("read", &self.read_handler.read().is_some())
            .field("write", &self.write_handler.read().is_some())
            .field("data_source_read", &self.data_source_read_handler.read().is_some())
            .field("data_source_write", &self.data_source_write_handler.read().is_some())
            .field("method", &self.method_handler.read().is_some())
            .finish()
    }
}

// =============================================================================
// Trampolines
// =============================================================================

/// Fixed-signature dispatch entry points installed into the stack's
/// callback records. Never panic across this boundary: every path returns
/// a value matching the stack's expected signature.
mod trampoline {
    use super::*;

    /// Context slot → owner → manager. `None` means a binding bug (the
    /// slot was never written, or the owner is already gone).
    fn resolve(
        context: Option<&ObjectRef>,
        node_id: &NodeId,
    ) -> Option<(Arc<dyn NodeOwner>, Arc<NodeEventManager>)> {
        let owner = context?.upgrade()?;
        let manager = owner.event_manager(node_id)?;
        Some((owner, manager))
    }

    pub(super) fn value_read(event: &ValueEvent<'_>) {
        let Some((_, manager)) = resolve(event.node_context, event.node_id) else {
            debug!(node_id = %event.node_id, "read event dropped: node is not bound");
            return;
        };
        let guard = manager.read_handler.read();
        if let Some(handler) = guard.as_ref() {
            handler(ReadArgs {
                server: event.server,
                session_id: event.session_id,
                session: event.session,
                node_id: event.node_id,
                range: event.range,
                value: event.value,
            });
        }
    }

    pub(super) fn value_write(event: &ValueEvent<'_>) {
        let Some((_, manager)) = resolve(event.node_context, event.node_id) else {
            debug!(node_id = %event.node_id, "write event dropped: node is not bound");
            return;
        };
        let guard = manager.write_handler.read();
        if let Some(handler) = guard.as_ref() {
            handler(WriteArgs {
                server: event.server,
                session_id: event.session_id,
                session: event.session,
                node_id: event.node_id,
                range: event.range,
                value: event.value,
            });
        }
    }

    pub(super) fn data_source_read(event: &mut DataSourceReadEvent<'_>) -> StatusCode {
        let Some((_, manager)) = resolve(event.node_context, event.node_id) else {
            return StatusCode::BAD_INTERNAL_ERROR;
        };
        let guard = manager.data_source_read_handler.read();
        match guard.as_ref() {
            Some(handler) => handler(DataSourceReadArgs {
                server: event.server,
                session_id: event.session_id,
                session: event.session,
                node_id: event.node_id,
                include_source_timestamp: event.include_source_timestamp,
                range: event.range,
                value: &mut *event.value,
            }),
            None => StatusCode::BAD_INTERNAL_ERROR,
        }
    }

    pub(super) fn data_source_write(event: &DataSourceWriteEvent<'_>) -> StatusCode {
        let Some((_, manager)) = resolve(event.node_context, event.node_id) else {
            return StatusCode::BAD_INTERNAL_ERROR;
        };
        let guard = manager.data_source_write_handler.read();
        match guard.as_ref() {
            Some(handler) => handler(DataSourceWriteArgs {
                server: event.server,
                session_id: event.session_id,
                session: event.session,
                node_id: event.node_id,
                range: event.range,
                value: event.value,
            }),
            None => StatusCode::BAD_INTERNAL_ERROR,
        }
    }

    pub(super) fn method_call(event: &mut MethodEvent<'_>) -> StatusCode {
        let Some((owner, manager)) = resolve(event.method_context, event.method_id) else {
            return StatusCode::BAD_INTERNAL_ERROR;
        };

        // Authorization needs a session; a stack that cannot name the
        // caller gets a denial, not an internal error.
        let Some(session) = event.session else {
            warn!(method_id = %event.method_id, "method call without session context denied");
            return StatusCode::BAD_USER_ACCESS_DENIED;
        };
        if !owner.check_permission(Permission::Execute, event.method_id, session.as_ref()) {
            warn!(
                method_id = %event.method_id,
                session_id = %event.session_id,
                "method call denied: no execute permission"
            );
            return StatusCode::BAD_USER_ACCESS_DENIED;
        }

        let guard = manager.method_handler.read();
        match guard.as_ref() {
            Some(handler) => handler(MethodArgs {
                server: event.server,
                session_id: event.session_id,
                session: event.session,
                method_id: event.method_id,
                object_id: event.object_id,
                inputs: event.inputs,
                outputs: &mut *event.outputs,
            }),
            None => StatusCode::BAD_INTERNAL_ERROR,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::stack::MemoryAddressSpace;
    use anvil_core::UserIdentity;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct TestOwner {
        managers: RwLock<HashMap<NodeId, Arc<NodeEventManager>>>,
        allow_execute: bool,
        permission_checks: AtomicU32,
    }

    impl TestOwner {
        fn new(allow_execute: bool) -> Arc<Self> {
            Arc::new(Self {
                managers: RwLock::new(HashMap::new()),
                allow_execute,
                permission_checks: AtomicU32::new(0),
            })
        }

        fn bind(self: &Arc<Self>, server: &Arc<UaServer>, node_id: NodeId) -> Arc<NodeEventManager> {
            let owner: Arc<dyn NodeOwner> = self.clone();
            let weak: ObjectRef = Arc::downgrade(&owner);
            let manager = NodeEventManager::new(node_id.clone(), server.clone(), weak);
            self.managers.write().insert(node_id, manager.clone());
            manager
        }
    }

    impl NodeOwner for TestOwner {
        fn event_manager(&self, node_id: &NodeId) -> Option<Arc<NodeEventManager>> {
            self.managers.read().get(node_id).cloned()
        }

        fn check_permission(
            &self,
            _permission: Permission,
            _node_id: &NodeId,
            _session: &Session,
        ) -> bool {
            self.permission_checks.fetch_add(1, Ordering::Relaxed);
            self.allow_execute
        }
    }

    fn server() -> Arc<UaServer> {
        UaServer::new(Arc::new(MemoryAddressSpace::new()), ServerConfig::default()).unwrap()
    }

    #[test]
    fn test_construction_binds_node_context() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);

        owner.bind(&server, node.clone());
        let context = server.address_space().node_context(&node).unwrap();
        assert!(context.upgrade().is_some());
    }

    #[test]
    fn test_registration_installs_only_requested_trampolines() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);
        let manager = owner.bind(&server, node.clone());

        manager.on_write(|_args| {});

        let record = server.address_space().value_callbacks(&node);
        assert!(record.on_read.is_none());
        assert!(record.on_write.is_some());

        manager.on_read(|_args| {});
        let record = server.address_space().value_callbacks(&node);
        assert!(record.on_read.is_some());
        assert!(record.on_write.is_some());
    }

    #[test]
    fn test_write_dispatch_reaches_handler() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);
        let manager = owner.bind(&server, node.clone());

        let written = Arc::new(AtomicU32::new(0));
        let counter = written.clone();
        manager.on_write(move |args| {
            assert_eq!(args.value.value, Some(Variant::Double(42.0)));
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let callback = server.address_space().value_callbacks(&node).on_write.unwrap();
        let context = server.address_space().node_context(&node);
        let session_id = NodeId::numeric(1, 7);
        let value = DataValue::good(Variant::Double(42.0));
        callback(&ValueEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            node_id: &node,
            node_context: context.as_ref(),
            range: None,
            value: &value,
        });

        assert_eq!(written.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_dispatch_without_context_is_silent() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);
        let manager = owner.bind(&server, node.clone());
        manager.on_read(|_args| panic!("handler must not run"));

        let callback = server.address_space().value_callbacks(&node).on_read.unwrap();
        let session_id = NodeId::numeric(1, 7);
        let value = DataValue::good(Variant::Bool(true));
        // No node context supplied: dispatch drops the event.
        callback(&ValueEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            node_id: &node,
            node_context: None,
            range: None,
            value: &value,
        });
    }

    #[test]
    fn test_dispatch_after_owner_drop_fails_internally() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);
        let manager = owner.bind(&server, node.clone());
        manager.on_data_source_write(|_args| StatusCode::GOOD);

        let callback = server.address_space().data_source_callbacks(&node).write.unwrap();
        let context = server.address_space().node_context(&node);
        drop(manager);
        drop(owner);

        let session_id = NodeId::numeric(1, 7);
        let value = DataValue::good(Variant::Bool(true));
        let status = callback(&DataSourceWriteEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            node_id: &node,
            node_context: context.as_ref(),
            range: None,
            value: &value,
        });
        assert_eq!(status, StatusCode::BAD_INTERNAL_ERROR);
    }

    #[test]
    fn test_data_source_read_produces_value() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 3);
        let manager = owner.bind(&server, node.clone());

        manager.on_data_source_read(|args| {
            *args.value = DataValue::good(Variant::Int32(17));
            if args.include_source_timestamp {
                args.value.source_timestamp = Some(chrono::Utc::now());
            }
            StatusCode::GOOD
        });

        let callback = server.address_space().data_source_callbacks(&node).read.unwrap();
        let context = server.address_space().node_context(&node);
        let session_id = NodeId::numeric(1, 7);
        let mut out = DataValue::default();
        let status = callback(&mut DataSourceReadEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            node_id: &node,
            node_context: context.as_ref(),
            include_source_timestamp: true,
            range: None,
            value: &mut out,
        });

        assert_eq!(status, StatusCode::GOOD);
        assert_eq!(out.value, Some(Variant::Int32(17)));
        assert!(out.source_timestamp.is_some());
    }

    #[test]
    fn test_method_dispatch_checks_permission() {
        let server = server();
        let owner = TestOwner::new(false);
        let method = NodeId::numeric(2, 20);
        let object = NodeId::numeric(2, 19);
        let manager = owner.bind(&server, method.clone());

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        manager.on_method_call(move |_args| {
            counter.fetch_add(1, Ordering::Relaxed);
            StatusCode::GOOD
        });

        let session = server
            .create_session(NodeId::numeric(1, 7), UserIdentity::named("viewer"))
            .unwrap();
        let callback = server.address_space().method_callback(&method).unwrap();
        let context = server.address_space().node_context(&method);
        let session_id = session.session_id().clone();
        let mut outputs = Vec::new();
        let status = callback(&mut MethodEvent {
            server: &server,
            session_id: &session_id,
            session: Some(&session),
            method_id: &method,
            method_context: context.as_ref(),
            object_id: &object,
            object_context: None,
            inputs: &[],
            outputs: &mut outputs,
        });

        assert_eq!(status, StatusCode::BAD_USER_ACCESS_DENIED);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        assert_eq!(owner.permission_checks.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_method_dispatch_propagates_handler_status() {
        let server = server();
        let owner = TestOwner::new(true);
        let method = NodeId::numeric(2, 20);
        let object = NodeId::numeric(2, 19);
        let manager = owner.bind(&server, method.clone());

        manager.on_method_call(|args| {
            let doubled: Vec<Variant> = args
                .inputs
                .iter()
                .filter_map(|input| input.as_i64())
                .map(|v| Variant::Int64(v * 2))
                .collect();
            args.outputs.extend(doubled);
            StatusCode::BAD_OUT_OF_RANGE
        });

        let session = server
            .create_session(NodeId::numeric(1, 7), UserIdentity::named("operator"))
            .unwrap();
        let callback = server.address_space().method_callback(&method).unwrap();
        let context = server.address_space().node_context(&method);
        let session_id = session.session_id().clone();
        let mut outputs = Vec::new();
        let status = callback(&mut MethodEvent {
            server: &server,
            session_id: &session_id,
            session: Some(&session),
            method_id: &method,
            method_context: context.as_ref(),
            object_id: &object,
            object_context: None,
            inputs: &[Variant::Int32(21)],
            outputs: &mut outputs,
        });

        // The handler's status comes back verbatim, alongside its outputs.
        assert_eq!(status, StatusCode::BAD_OUT_OF_RANGE);
        assert_eq!(outputs, vec![Variant::Int64(42)]);
    }

    #[test]
    fn test_method_dispatch_without_session_is_denied() {
        let server = server();
        let owner = TestOwner::new(true);
        let method = NodeId::numeric(2, 20);
        let object = NodeId::numeric(2, 19);
        let manager = owner.bind(&server, method.clone());
        manager.on_method_call(|_args| StatusCode::GOOD);

        let callback = server.address_space().method_callback(&method).unwrap();
        let context = server.address_space().node_context(&method);
        let session_id = NodeId::numeric(1, 7);
        let mut outputs = Vec::new();
        let status = callback(&mut MethodEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            method_id: &method,
            method_context: context.as_ref(),
            object_id: &object,
            object_context: None,
            inputs: &[],
            outputs: &mut outputs,
        });

        assert_eq!(status, StatusCode::BAD_USER_ACCESS_DENIED);
        assert_eq!(owner.permission_checks.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_handler_replacement_is_idempotent() {
        let server = server();
        let owner = TestOwner::new(true);
        let node = NodeId::numeric(2, 1);
        let manager = owner.bind(&server, node.clone());

        let hits = Arc::new(AtomicU32::new(0));
        manager.on_write(|_args| panic!("replaced handler must not run"));
        let counter = hits.clone();
        manager.on_write(move |_args| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let callback = server.address_space().value_callbacks(&node).on_write.unwrap();
        let context = server.address_space().node_context(&node);
        let session_id = NodeId::numeric(1, 7);
        let value = DataValue::good(Variant::Bool(true));
        callback(&ValueEvent {
            server: &server,
            session_id: &session_id,
            session: None,
            node_id: &node,
            node_context: context.as_ref(),
            range: None,
            value: &value,
        });
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }
}
