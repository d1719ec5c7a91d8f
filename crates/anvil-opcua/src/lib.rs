// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # anvil-opcua
//!
//! The session-authorization and event-dispatch layer of an OPC UA server.
//!
//! This crate sits between a black-box protocol stack and the application
//! objects bound into the address space. It routes the stack's anonymous
//! per-node callbacks (attribute read/write, data-source read/write,
//! method invocation) to typed, handler-specific invocations, and it
//! arbitrates the single server-wide configuration control lock that
//! sessions acquire for exclusive write access to device configuration.
//!
//! # Components
//!
//! - [`stack`]: the contract consumed from the protocol stack
//!   ([`AddressSpace`](stack::AddressSpace)), plus the in-memory
//!   reference implementation
//! - [`node_events`]: per-node event registration and trampoline dispatch
//! - [`lock`]: the configuration control lock and its ownership tokens
//! - [`session`]: per-client session state delegating to the lock
//! - [`events`]: server-wide display-name/description change events
//! - [`server`]: the [`UaServer`](server::UaServer) handle tying it together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use anvil_core::{NodeId, UserIdentity};
//! use anvil_opcua::config::ServerConfig;
//! use anvil_opcua::server::UaServer;
//! use anvil_opcua::stack::MemoryAddressSpace;
//!
//! let server = UaServer::new(
//!     Arc::new(MemoryAddressSpace::new()),
//!     ServerConfig::builder().control_lock_password("admin123").build().unwrap(),
//! ).unwrap();
//!
//! let session = server
//!     .create_session(NodeId::numeric(1, 100), UserIdentity::named("operator"))
//!     .unwrap();
//! assert!(session.lock_configuration_control(Duration::from_secs(30)));
//! assert!(session.has_configuration_control_lock());
//! ```
//!
//! # Concurrency
//!
//! The layer is reactive and fully synchronous: the protocol stack drives
//! all dispatch from its own worker threads, and every operation here
//! returns before the triggering protocol call completes. Lock state is
//! linearized behind one mutex; handler slots are written during node
//! setup and only read during dispatch.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod lock;
pub mod node_events;
pub mod server;
pub mod session;
pub mod stack;

// Re-export commonly used types
pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{ConfigError, ServerError, SessionError};
pub use events::{DescriptionChangedHandler, DisplayNameChangedHandler, ServerEventManager};
pub use lock::{LockToken, ServerLock};
pub use node_events::{
    DataSourceReadArgs, DataSourceWriteArgs, MethodArgs, NodeEventManager, ReadArgs, WriteArgs,
};
pub use server::UaServer;
pub use session::Session;
pub use stack::{
    AddressSpace, DataSourceCallbacks, DataSourceReadEvent, DataSourceWriteEvent,
    MemoryAddressSpace, MethodEvent, NodeOwner, ObjectRef, ValueCallbacks, ValueEvent,
};
