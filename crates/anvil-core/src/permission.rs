// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node access permissions and user identity.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Permission
// =============================================================================

/// Permissions checked before a node operation is dispatched.
///
/// The owning application object decides whether a session holds a
/// permission on a given node; the dispatch layer only asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Read a node attribute or value.
    Read,
    /// Write a node attribute or value.
    Write,
    /// Invoke a method node.
    Execute,
}

impl Permission {
    /// Returns the permission name as a string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Execute => "execute",
        }
    }

    /// Parses a permission from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" | "Read" => Some(Permission::Read),
            "write" | "Write" => Some(Permission::Write),
            "execute" | "Execute" => Some(Permission::Execute),
            _ => None,
        }
    }

    /// Returns all available permissions.
    pub fn all() -> &'static [Permission] {
        &[Permission::Read, Permission::Write, Permission::Execute]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// UserIdentity
// =============================================================================

/// The authenticated identity attached to a session at activation.
///
/// Authentication itself happens outside this layer; the identity is
/// carried here so permission checks and audit trails can name the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct UserIdentity {
    /// Username, absent for anonymous sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

impl UserIdentity {
    /// Creates an anonymous identity.
    pub const fn anonymous() -> Self {
        Self { username: None }
    }

    /// Creates a named identity.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Returns the username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns `true` if this identity is anonymous.
    pub const fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "<anonymous>"),
        }
    }
}
