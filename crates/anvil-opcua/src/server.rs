// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The server handle.
//!
//! [`UaServer`] ties the collaborators of this layer together: the
//! address-space contract of the protocol stack, the server-wide event
//! manager, the single configuration control lock, and the session table.
//! It is owned by the application layer and outlives every
//! [`NodeEventManager`](crate::node_events::NodeEventManager) and
//! [`Session`].

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use anvil_core::{NodeId, UserIdentity};

use crate::config::ServerConfig;
use crate::error::{ServerError, SessionError};
use crate::events::ServerEventManager;
use crate::lock::ServerLock;
use crate::session::Session;
use crate::stack::AddressSpace;

/// The server-side anchor of the dispatch layer.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use anvil_core::{NodeId, UserIdentity};
/// use anvil_opcua::config::ServerConfig;
/// use anvil_opcua::server::UaServer;
/// use anvil_opcua::stack::MemoryAddressSpace;
///
/// let server = UaServer::new(
///     Arc::new(MemoryAddressSpace::new()),
///     ServerConfig::default(),
/// ).unwrap();
///
/// let session = server
///     .create_session(NodeId::numeric(1, 100), UserIdentity::named("operator"))
///     .unwrap();
/// assert_eq!(server.session(session.session_id()).unwrap().user().username(), Some("operator"));
/// ```
pub struct UaServer {
    address_space: Arc<dyn AddressSpace>,
    event_manager: ServerEventManager,
    control_lock: Arc<ServerLock>,
    sessions: DashMap<NodeId, Arc<Session>>,
}

impl UaServer {
    /// Creates a server over the given address space.
    pub fn new(
        address_space: Arc<dyn AddressSpace>,
        config: ServerConfig,
    ) -> Result<Arc<Self>, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let control_lock = match config.control_lock_password {
            Some(password) => Arc::new(ServerLock::with_password(password)),
            None => Arc::new(ServerLock::new()),
        };

        info!("OPC UA dispatch layer initialized");
        Ok(Arc::new(Self {
            address_space,
            event_manager: ServerEventManager::new(),
            control_lock,
            sessions: DashMap::new(),
        }))
    }

    /// Returns the protocol stack's address space.
    pub fn address_space(&self) -> &Arc<dyn AddressSpace> {
        &self.address_space
    }

    /// Returns the server-wide attribute-change event manager.
    pub fn event_manager(&self) -> &ServerEventManager {
        &self.event_manager
    }

    /// Returns the configuration control lock.
    pub fn control_lock(&self) -> &Arc<ServerLock> {
        &self.control_lock
    }

    /// Registers a session for an activated client connection.
    ///
    /// # Errors
    ///
    /// Fails when `session_id` is null or already registered.
    pub fn create_session(
        &self,
        session_id: NodeId,
        user: UserIdentity,
    ) -> Result<Arc<Session>, SessionError> {
        if session_id.is_null() {
            return Err(SessionError::NullSessionId);
        }
        match self.sessions.entry(session_id.clone()) {
            Entry::Occupied(_) => Err(SessionError::DuplicateSession(session_id)),
            Entry::Vacant(entry) => {
                debug!(session_id = %session_id, user = %user, "session created");
                let session = Arc::new(Session::new(
                    session_id,
                    user,
                    self.control_lock.clone(),
                ));
                entry.insert(session.clone());
                Ok(session)
            }
        }
    }

    /// Returns the session registered under `session_id`.
    pub fn session(&self, session_id: &NodeId) -> Option<Arc<Session>> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    /// Removes a session when its connection ends.
    ///
    /// A configuration lock held by the session's token stays in place:
    /// the lock is keyed by token value, so a client reconnecting with the
    /// same override token keeps its hold.
    pub fn close_session(&self, session_id: &NodeId) -> Result<(), SessionError> {
        match self.sessions.remove(session_id) {
            Some(_) => {
                debug!(session_id = %session_id, "session closed");
                Ok(())
            }
            None => Err(SessionError::UnknownSession(session_id.clone())),
        }
    }

    /// Returns the number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl fmt::Debug for UaServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaServer")
            .field("sessions", &self.sessions.len())
            .field("event_manager", &self.event_manager)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
