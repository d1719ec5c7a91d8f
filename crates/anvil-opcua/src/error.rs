// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error hierarchy for the server layer.
//!
//! ```text
//! ServerError (root)
//! ├── ConfigError   - Configuration validation
//! └── SessionError  - Session registry operations
//! ```
//!
//! Dispatch paths never surface these errors to the protocol stack; the
//! trampolines speak `StatusCode` (see `anvil_core::StatusCode`). This
//! hierarchy covers the embedding API only.

use anvil_core::NodeId;
use thiserror::Error;

// =============================================================================
// ServerError - Root Error Type
// =============================================================================

/// The root error type for the server layer.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session registry error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration field failed validation.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// SessionError
// =============================================================================

/// Session registry errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The null node id cannot identify a session.
    #[error("Session id must not be the null node id")]
    NullSessionId,

    /// A session with the same id is already registered.
    #[error("Session '{0}' already exists")]
    DuplicateSession(NodeId),

    /// No session with this id is registered.
    #[error("Session '{0}' is not registered")]
    UnknownSession(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: ServerError = ConfigError::validation("password", "must not be empty").into();
        assert!(matches!(err, ServerError::Config(_)));
        assert!(err.to_string().contains("password"));

        let err: ServerError = SessionError::DuplicateSession(NodeId::numeric(1, 42)).into();
        assert!(err.to_string().contains("ns=1;i=42"));
    }
}
