// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The server-wide configuration control lock.
//!
//! Exactly one [`ServerLock`] exists per server. Sessions acquire it to
//! gain exclusive write access to device configuration; every acquisition
//! carries a timeout so a disconnected client cannot block configuration
//! forever. An optional password provides an administrative override that
//! works independently of the token protocol.
//!
//! Expiry is advisory: no timer runs. A lapsed hold is reclaimed the next
//! time any caller touches the lock.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use anvil_core::NodeId;

// =============================================================================
// LockToken
// =============================================================================

/// The unit of lock ownership.
///
/// A token is either a session identifier or an explicitly assigned
/// identifier shared across reconnects (see
/// [`Session::set_configuration_lock_token`](crate::session::Session::set_configuration_lock_token)).
/// Two tokens are equal iff their underlying node ids are equal; the null
/// token never equals a valid session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LockToken(NodeId);

impl LockToken {
    /// Creates a token from a node id.
    #[inline]
    pub fn new(node_id: NodeId) -> Self {
        Self(node_id)
    }

    /// Returns the null token.
    #[inline]
    pub const fn null() -> Self {
        Self(NodeId::null())
    }

    /// Returns `true` if this is the null token.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the underlying node id.
    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.0
    }
}

impl From<NodeId> for LockToken {
    fn from(node_id: NodeId) -> Self {
        Self(node_id)
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ServerLock
// =============================================================================

/// Guarded lock state. Holder and expiry are only ever read or written
/// together, under the outer mutex.
#[derive(Debug, Default)]
struct LockState {
    holder: Option<LockToken>,
    expiry: Option<Instant>,
    password: Option<String>,
}

impl LockState {
    /// Reclaims a lapsed hold. Expiry is checked lazily here rather than
    /// by a timer.
    fn lapse(&mut self) {
        if let Some(expiry) = self.expiry {
            if Instant::now() >= expiry {
                debug!(token = ?self.holder, "configuration control lock expired");
                self.holder = None;
                self.expiry = None;
            }
        }
    }

    fn held_by(&self, caller: &LockToken) -> bool {
        self.holder.as_ref() == Some(caller)
    }
}

/// The process-wide configuration control lock.
///
/// All operations are linearizable: holder, expiry, and password live
/// behind one mutex, so two sessions can never both observe "unheld" and
/// both acquire.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use anvil_core::NodeId;
/// use anvil_opcua::lock::{LockToken, ServerLock};
///
/// let lock = ServerLock::new();
/// let s1 = LockToken::new(NodeId::numeric(1, 100));
/// let s2 = LockToken::new(NodeId::numeric(1, 200));
///
/// assert!(lock.try_acquire(&s1, Duration::from_secs(10)));
/// assert!(!lock.try_acquire(&s2, Duration::from_secs(1)));
/// assert!(lock.can_control(&s1));
/// assert!(!lock.can_control(&s2));
/// ```
#[derive(Debug, Default)]
pub struct ServerLock {
    state: Mutex<LockState>,
}

impl ServerLock {
    /// Creates an unheld lock with no password configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unheld lock protected by an override password.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(LockState {
                holder: None,
                expiry: None,
                password: Some(password.into()),
            }),
        }
    }

    /// Returns `true` iff the lock is currently held (unexpired) by `caller`.
    pub fn has_lock(&self, caller: &LockToken) -> bool {
        let mut state = self.state.lock();
        state.lapse();
        state.held_by(caller)
    }

    /// Releases the lock if `caller` holds it.
    ///
    /// Releasing a lock you do not hold is a no-op, not an error: sessions
    /// call this on teardown without checking first.
    pub fn try_release(&self, caller: &LockToken) {
        let mut state = self.state.lock();
        state.lapse();
        if state.held_by(caller) {
            state.holder = None;
            state.expiry = None;
            debug!(token = %caller, "configuration control lock released");
        }
    }

    /// Attempts to acquire the lock for `caller`, holding it for `timeout`.
    ///
    /// Succeeds when the lock is unheld or expired, and re-entrantly when
    /// `caller` already holds it (refreshing the expiry). Fails without
    /// mutation when a different token holds an unexpired lock.
    pub fn try_acquire(&self, caller: &LockToken, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        state.lapse();
        match &state.holder {
            Some(holder) if holder != caller => {
                debug!(token = %caller, holder = %holder, "configuration control lock busy");
                false
            }
            _ => {
                state.holder = Some(caller.clone());
                state.expiry = Some(Instant::now() + timeout);
                debug!(
                    token = %caller,
                    timeout_ms = timeout.as_millis() as u64,
                    "configuration control lock acquired"
                );
                true
            }
        }
    }

    /// Returns `true` if `caller` is currently permitted to mutate
    /// configuration: the lock is unheld/expired, or held by `caller`.
    pub fn can_control(&self, caller: &LockToken) -> bool {
        let mut state = self.state.lock();
        state.lapse();
        match &state.holder {
            Some(holder) => holder == caller,
            None => true,
        }
    }

    /// Acquires the lock indefinitely when `password` matches the
    /// configured override password.
    ///
    /// A matching password behaves like [`try_acquire`](Self::try_acquire)
    /// with no expiry; it does not displace a different unexpired holder.
    /// A mismatch (or no configured password) returns `false` without
    /// mutation.
    pub fn password_lock(&self, password: &str, caller: &LockToken) -> bool {
        let mut state = self.state.lock();
        state.lapse();
        if !password_matches(state.password.as_deref(), password) {
            warn!(token = %caller, "configuration control password lock rejected");
            return false;
        }
        match &state.holder {
            Some(holder) if holder != caller => false,
            _ => {
                state.holder = Some(caller.clone());
                state.expiry = None;
                debug!(token = %caller, "configuration control lock acquired via password");
                true
            }
        }
    }

    /// Force-releases the lock when `password` matches, regardless of the
    /// current holder. A mismatch returns `false` and leaves the lock
    /// untouched.
    pub fn password_unlock(&self, password: &str, caller: &LockToken) -> bool {
        let mut state = self.state.lock();
        if !password_matches(state.password.as_deref(), password) {
            warn!(token = %caller, "configuration control password unlock rejected");
            return false;
        }
        state.holder = None;
        state.expiry = None;
        debug!(token = %caller, "configuration control lock force-released via password");
        true
    }
}

/// Compares the supplied password against the configured one without
/// short-circuiting on the first differing byte.
fn password_matches(configured: Option<&str>, supplied: &str) -> bool {
    let Some(configured) = configured else {
        return false;
    };
    let configured = configured.as_bytes();
    let supplied = supplied.as_bytes();

    let mut diff = configured.len() ^ supplied.len();
    for i in 0..configured.len().max(supplied.len()) {
        let a = configured.get(i).copied().unwrap_or(0);
        let b = supplied.get(i).copied().unwrap_or(0);
        diff |= (a ^ b) as usize;
    }
    diff == 0
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: u32) -> LockToken {
        LockToken::new(NodeId::numeric(1, value))
    }

    #[test]
    fn test_token_equality() {
        assert_eq!(token(1), token(1));
        assert_ne!(token(1), token(2));
        assert!(LockToken::null().is_null());
        assert_ne!(LockToken::null(), token(1));
        assert_eq!(LockToken::from(NodeId::numeric(1, 5)), token(5));
    }

    #[test]
    fn test_acquire_and_release() {
        let lock = ServerLock::new();
        let s1 = token(1);
        let s2 = token(2);

        assert!(lock.can_control(&s1));
        assert!(!lock.has_lock(&s1));

        assert!(lock.try_acquire(&s1, Duration::from_secs(10)));
        assert!(lock.has_lock(&s1));
        assert!(lock.can_control(&s1));
        assert!(!lock.has_lock(&s2));
        assert!(!lock.can_control(&s2));

        lock.try_release(&s1);
        assert!(!lock.has_lock(&s1));
        assert!(lock.can_control(&s2));
    }

    #[test]
    fn test_reentrant_acquire_refreshes_expiry() {
        let lock = ServerLock::new();
        let s1 = token(1);

        assert!(lock.try_acquire(&s1, Duration::from_millis(40)));
        std::thread::sleep(Duration::from_millis(25));
        // Refresh before the first hold lapses.
        assert!(lock.try_acquire(&s1, Duration::from_millis(60)));
        std::thread::sleep(Duration::from_millis(30));
        // The original 40ms are long gone; the refreshed hold is still live.
        assert!(lock.has_lock(&s1));
    }

    #[test]
    fn test_release_by_non_holder_is_ignored() {
        let lock = ServerLock::new();
        let s1 = token(1);
        let s2 = token(2);

        assert!(lock.try_acquire(&s1, Duration::from_secs(10)));
        lock.try_release(&s2);
        assert!(lock.has_lock(&s1));
        assert!(!lock.can_control(&s2));
    }

    #[test]
    fn test_expiry_reclaims_lazily() {
        let lock = ServerLock::new();
        let s1 = token(1);
        let s2 = token(2);

        assert!(lock.try_acquire(&s1, Duration::from_millis(20)));
        assert!(!lock.try_acquire(&s2, Duration::from_secs(5)));

        std::thread::sleep(Duration::from_millis(30));

        // No explicit release happened; expiry alone re-opens the lock.
        assert!(lock.can_control(&s2));
        assert!(lock.try_acquire(&s2, Duration::from_secs(5)));
        assert!(!lock.has_lock(&s1));
    }

    #[test]
    fn test_contention_scenario() {
        let lock = ServerLock::new();
        let s1 = token(1);
        let s2 = token(2);

        assert!(lock.try_acquire(&s1, Duration::from_millis(100)));
        assert!(!lock.try_acquire(&s2, Duration::from_millis(10)));

        // s2's requested timeout lapsing is irrelevant; s1 still holds.
        std::thread::sleep(Duration::from_millis(15));
        assert!(!lock.can_control(&s2));

        std::thread::sleep(Duration::from_millis(100));
        assert!(lock.try_acquire(&s2, Duration::from_millis(50)));
    }

    #[test]
    fn test_password_lock() {
        let lock = ServerLock::with_password("admin123");
        let s1 = token(1);
        let s2 = token(2);

        assert!(!lock.password_lock("wrong", &s1));
        assert!(!lock.has_lock(&s1));

        assert!(lock.password_lock("admin123", &s1));
        assert!(lock.has_lock(&s1));

        // Indefinite hold: does not lapse.
        std::thread::sleep(Duration::from_millis(30));
        assert!(lock.has_lock(&s1));

        // A matching password does not displace another holder.
        assert!(!lock.password_lock("admin123", &s2));
        assert!(lock.has_lock(&s1));
    }

    #[test]
    fn test_password_unlock() {
        let lock = ServerLock::with_password("admin123");
        let s1 = token(1);
        let admin = token(99);

        assert!(lock.try_acquire(&s1, Duration::from_secs(60)));

        assert!(!lock.password_unlock("wrong", &admin));
        assert!(lock.has_lock(&s1));

        // Force release by a token that never held the lock.
        assert!(lock.password_unlock("admin123", &admin));
        assert!(!lock.has_lock(&s1));
        assert!(lock.can_control(&admin));
    }

    #[test]
    fn test_password_ops_fail_without_configured_password() {
        let lock = ServerLock::new();
        let s1 = token(1);

        assert!(!lock.password_lock("", &s1));
        assert!(!lock.password_lock("anything", &s1));
        assert!(!lock.password_unlock("anything", &s1));
    }

    #[test]
    fn test_password_comparison() {
        assert!(password_matches(Some("abc"), "abc"));
        assert!(!password_matches(Some("abc"), "abd"));
        assert!(!password_matches(Some("abc"), "ab"));
        assert!(!password_matches(Some("abc"), "abcd"));
        assert!(!password_matches(None, "abc"));
        assert!(!password_matches(None, ""));
    }

    #[test]
    fn test_concurrent_acquisition_is_exclusive() {
        use std::sync::Arc;

        let lock = Arc::new(ServerLock::new());
        let mut handles = Vec::new();
        for i in 0..8u32 {
            let lock = lock.clone();
            handles.push(std::thread::spawn(move || {
                lock.try_acquire(&token(i), Duration::from_secs(10))
            }));
        }
        let acquired: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(acquired, 1);
    }
}
