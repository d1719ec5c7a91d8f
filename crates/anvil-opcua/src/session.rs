// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-client session state.
//!
//! A [`Session`] is created when the protocol stack activates a client
//! connection and destroyed when the connection ends. It is a thin adapter
//! over the single [`ServerLock`]: every lock operation goes through the
//! session's *effective token*, which is the explicitly installed override
//! token when one is set, and the session id otherwise.
//!
//! Destroying a session does not release a held lock. The lock is keyed by
//! token value, not by session lifetime, so a client that reconnects and
//! installs the same override token finds its lock still held.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use anvil_core::{NodeId, UserIdentity};

use crate::lock::{LockToken, ServerLock};

/// A client session.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use anvil_core::{NodeId, UserIdentity};
/// use anvil_opcua::lock::ServerLock;
/// use anvil_opcua::session::Session;
///
/// let lock = Arc::new(ServerLock::new());
/// let session = Session::new(NodeId::numeric(1, 100), UserIdentity::anonymous(), lock);
///
/// assert!(session.lock_configuration_control(Duration::from_secs(10)));
/// assert!(session.has_configuration_control_lock());
/// session.refuse_configuration_control_lock();
/// assert!(!session.has_configuration_control_lock());
/// ```
pub struct Session {
    /// Assigned by the protocol stack at connection establishment.
    session_id: NodeId,

    /// Assigned at authentication.
    user: UserIdentity,

    /// The single server lock, owned by the server.
    server_lock: Arc<ServerLock>,

    /// Optional override token; the null token means "no override",
    /// mirroring the wire convention where clients clear the override by
    /// writing the null node id.
    configuration_lock_token: RwLock<LockToken>,
}

impl Session {
    /// Creates a session for an established client connection.
    pub fn new(session_id: NodeId, user: UserIdentity, server_lock: Arc<ServerLock>) -> Self {
        Self {
            session_id,
            user,
            server_lock,
            configuration_lock_token: RwLock::new(LockToken::null()),
        }
    }

    /// Returns the session identifier.
    pub fn session_id(&self) -> &NodeId {
        &self.session_id
    }

    /// Returns the authenticated user.
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Installs an override lock token.
    ///
    /// A client installs an override when it wants to coordinate locking
    /// under an identifier that survives reconnects, distinct from the
    /// ephemeral session id. Installing the null token removes the
    /// override.
    pub fn set_configuration_lock_token(&self, token: LockToken) {
        *self.configuration_lock_token.write() = token;
    }

    /// Returns the token this session presents to the server lock: the
    /// override when one is installed, the session id otherwise.
    pub fn effective_token(&self) -> LockToken {
        let override_token = self.configuration_lock_token.read();
        if override_token.is_null() {
            LockToken::new(self.session_id.clone())
        } else {
            override_token.clone()
        }
    }

    /// Returns `true` iff this session currently holds the configuration
    /// control lock.
    pub fn has_configuration_control_lock(&self) -> bool {
        self.server_lock.has_lock(&self.effective_token())
    }

    /// Gives up the configuration control lock if held. Safe to call
    /// unconditionally on teardown.
    pub fn refuse_configuration_control_lock(&self) {
        self.server_lock.try_release(&self.effective_token());
    }

    /// Attempts to take the configuration control lock for `timeout`.
    pub fn lock_configuration_control(&self, timeout: Duration) -> bool {
        self.server_lock.try_acquire(&self.effective_token(), timeout)
    }

    /// Returns `true` if this session may currently mutate configuration
    /// (lock unheld, expired, or held by this session's token).
    pub fn can_control_acq(&self) -> bool {
        self.server_lock.can_control(&self.effective_token())
    }

    /// Takes the lock indefinitely via the override password.
    pub fn password_lock(&self, password: &str) -> bool {
        self.server_lock.password_lock(password, &self.effective_token())
    }

    /// Force-releases the lock via the override password.
    pub fn password_unlock(&self, password: &str) -> bool {
        self.server_lock.password_unlock(password, &self.effective_token())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("user", &self.user)
            .field("configuration_lock_token", &*self.configuration_lock_token.read())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
