// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// =============================================================================
// ServerConfig
// =============================================================================

/// Configuration consumed by [`UaServer::new`](crate::server::UaServer::new).
///
/// # Examples
///
/// ```
/// use anvil_opcua::config::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .control_lock_password("admin123")
///     .build()
///     .unwrap();
/// assert_eq!(config.control_lock_password.as_deref(), Some("admin123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Password for the administrative configuration-lock override.
    ///
    /// When unset, `password_lock`/`password_unlock` always fail and the
    /// lock can only be managed through the token-based protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_lock_password: Option<String>,
}

impl ServerConfig {
    /// Returns a builder for this configuration.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(password) = &self.control_lock_password {
            if password.is_empty() {
                return Err(ConfigError::validation(
                    "control_lock_password",
                    "Password must not be empty when configured",
                ));
            }
        }
        Ok(())
    }
}

// =============================================================================
// ServerConfigBuilder
// =============================================================================

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    control_lock_password: Option<String>,
}

impl ServerConfigBuilder {
    /// Sets the configuration-lock override password.
    pub fn control_lock_password(mut self, password: impl Into<String>) -> Self {
        self.control_lock_password = Some(password.into());
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            control_lock_password: self.control_lock_password,
        };
        config.validate()?;
        Ok(config)
    }
}
