// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # anvil-core
//!
//! Core OPC UA data types shared by the Anvil server toolkit.
//!
//! This crate provides the protocol-level vocabulary used by every Anvil
//! component:
//!
//! - **Types**: `NodeId`, `Variant`, `DataValue`, `NumericRange`, `LocalizedText`
//! - **Status**: OPC UA `StatusCode` with severity classification
//! - **Permission**: node access permissions and the authenticated `UserIdentity`
//! - **Error**: parse-error hierarchy for identifier and range strings
//!
//! # Example
//!
//! ```
//! use anvil_core::{NodeId, StatusCode, Variant};
//!
//! let node: NodeId = "ns=2;s=Device.Temperature".parse().unwrap();
//! assert_eq!(node.namespace_index, 2);
//!
//! let value = Variant::Double(25.5);
//! assert_eq!(value.as_f64(), Some(25.5));
//!
//! assert!(StatusCode::GOOD.is_good());
//! assert!(StatusCode::BAD_USER_ACCESS_DENIED.is_bad());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod permission;
pub mod status;
pub mod types;

pub use error::ParseError;
pub use permission::{Permission, UserIdentity};
pub use status::StatusCode;
pub use types::{DataValue, LocalizedText, NodeId, NodeIdentifier, NumericRange, Variant};
