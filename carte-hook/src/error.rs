//! Error types for the Carte hook

use carte_core::domain::connection::ConfigError;
use thiserror::Error;

/// Result type alias for hook operations
pub type Result<T> = std::result::Result<T, HookError>;

/// Errors that can occur while resolving a connection
#[derive(Debug, Error)]
pub enum HookError {
    /// The provider has no connection with this id
    #[error("Connection not found: {0}")]
    UnknownConnection(String),

    /// The stored connection is not valid JSON
    #[error("Connection {conn_id} is not valid JSON: {source}")]
    MalformedConnection {
        conn_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// The connection lacks something a Carte client needs
    #[error("Connection {conn_id} is invalid: {reason}")]
    InvalidConnection { conn_id: String, reason: String },

    /// The resolved settings failed validation
    #[error("Connection {conn_id} has invalid settings: {source}")]
    InvalidConfig {
        conn_id: String,
        #[source]
        source: ConfigError,
    },
}

impl HookError {
    pub fn invalid(conn_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConnection {
            conn_id: conn_id.into(),
            reason: reason.into(),
        }
    }
}
