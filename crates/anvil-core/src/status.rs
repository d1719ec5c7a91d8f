// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA status codes.
//!
//! Status codes are 32-bit values whose top two bits encode severity:
//! `00` good, `01` uncertain, `10` bad. Dispatch paths in the server layer
//! return these codes verbatim to the protocol stack.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An OPC UA status code.
///
/// # Examples
///
/// ```
/// use anvil_core::StatusCode;
///
/// assert!(StatusCode::GOOD.is_good());
/// assert!(StatusCode::BAD_INTERNAL_ERROR.is_bad());
/// assert!(!StatusCode::BAD_USER_ACCESS_DENIED.is_good());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct StatusCode(u32);

impl StatusCode {
    /// The operation succeeded.
    pub const GOOD: StatusCode = StatusCode(0x0000_0000);

    /// An unexpected error occurred.
    pub const BAD_UNEXPECTED_ERROR: StatusCode = StatusCode(0x8001_0000);

    /// An internal error occurred as a result of a programming or configuration error.
    pub const BAD_INTERNAL_ERROR: StatusCode = StatusCode(0x8002_0000);

    /// Not enough resources to complete the operation.
    pub const BAD_RESOURCE_UNAVAILABLE: StatusCode = StatusCode(0x8004_0000);

    /// The operation timed out.
    pub const BAD_TIMEOUT: StatusCode = StatusCode(0x800A_0000);

    /// The user does not have permission to perform the requested operation.
    pub const BAD_USER_ACCESS_DENIED: StatusCode = StatusCode(0x801F_0000);

    /// The session id is not valid.
    pub const BAD_SESSION_ID_INVALID: StatusCode = StatusCode(0x8025_0000);

    /// The syntax of the node id is not valid.
    pub const BAD_NODE_ID_INVALID: StatusCode = StatusCode(0x8033_0000);

    /// The node id refers to a node that does not exist in the server address space.
    pub const BAD_NODE_ID_UNKNOWN: StatusCode = StatusCode(0x8034_0000);

    /// The syntax of the index range parameter is invalid.
    pub const BAD_INDEX_RANGE_INVALID: StatusCode = StatusCode(0x8036_0000);

    /// The access level does not allow reading the node.
    pub const BAD_NOT_READABLE: StatusCode = StatusCode(0x803A_0000);

    /// The access level does not allow writing to the node.
    pub const BAD_NOT_WRITABLE: StatusCode = StatusCode(0x803B_0000);

    /// The value was out of range.
    pub const BAD_OUT_OF_RANGE: StatusCode = StatusCode(0x803C_0000);

    /// The method id does not refer to a method for the specified object.
    pub const BAD_METHOD_INVALID: StatusCode = StatusCode(0x8075_0000);

    /// The client did not specify all of the input arguments for the method.
    pub const BAD_ARGUMENTS_MISSING: StatusCode = StatusCode(0x8076_0000);

    /// The value is an initial value for a variable that normally receives its
    /// value from another variable.
    pub const UNCERTAIN_INITIAL_VALUE: StatusCode = StatusCode(0x4092_0000);

    /// Creates a status code from its raw numeric value.
    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the severity is good.
    #[inline]
    pub const fn is_good(&self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    /// Returns `true` if the severity is uncertain.
    #[inline]
    pub const fn is_uncertain(&self) -> bool {
        self.0 & 0x4000_0000 != 0 && self.0 & 0x8000_0000 == 0
    }

    /// Returns `true` if the severity is bad.
    #[inline]
    pub const fn is_bad(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// Returns the symbolic name for well-known codes.
    pub const fn name(&self) -> &'static str {
        match self.0 {
            0x0000_0000 => "Good",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8004_0000 => "BadResourceUnavailable",
            0x800A_0000 => "BadTimeout",
            0x801F_0000 => "BadUserAccessDenied",
            0x8025_0000 => "BadSessionIdInvalid",
            0x8033_0000 => "BadNodeIdInvalid",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8036_0000 => "BadIndexRangeInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803B_0000 => "BadNotWritable",
            0x803C_0000 => "BadOutOfRange",
            0x8075_0000 => "BadMethodInvalid",
            0x8076_0000 => "BadArgumentsMissing",
            0x4092_0000 => "UncertainInitialValue",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X} ({})", self.0, self.name())
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());
        assert!(!StatusCode::GOOD.is_uncertain());

        assert!(StatusCode::BAD_INTERNAL_ERROR.is_bad());
        assert!(!StatusCode::BAD_INTERNAL_ERROR.is_good());
        assert!(!StatusCode::BAD_INTERNAL_ERROR.is_uncertain());

        assert!(StatusCode::UNCERTAIN_INITIAL_VALUE.is_uncertain());
        assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_good());
        assert!(!StatusCode::UNCERTAIN_INITIAL_VALUE.is_bad());
    }

    #[test]
    fn test_default_is_good() {
        assert_eq!(StatusCode::default(), StatusCode::GOOD);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            StatusCode::BAD_USER_ACCESS_DENIED.to_string(),
            "0x801F0000 (BadUserAccessDenied)"
        );
        assert_eq!(StatusCode::from_raw(0xDEAD_BEEF).name(), "Unknown");
    }

    #[test]
    fn test_raw_round_trip() {
        let code = StatusCode::from_raw(0x803B_0000);
        assert_eq!(code, StatusCode::BAD_NOT_WRITABLE);
        assert_eq!(code.raw(), 0x803B_0000);
        assert_eq!(StatusCode::from(0x803B_0000u32), code);
    }
}
