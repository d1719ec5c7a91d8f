// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Parse errors for OPC UA identifier and range strings.

use thiserror::Error;

/// Errors produced when parsing OPC UA textual formats.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input is not a valid node id string.
    #[error("Invalid node id '{input}': {reason}")]
    InvalidNodeId {
        /// The offending input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The input is not a valid numeric range string.
    #[error("Invalid numeric range '{input}': {reason}")]
    InvalidNumericRange {
        /// The offending input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl ParseError {
    /// Creates an invalid node id error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid numeric range error.
    pub fn invalid_numeric_range(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNumericRange {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
