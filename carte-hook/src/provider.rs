//! Connection providers
//!
//! The connection store belongs to the orchestrator. The hook only needs one
//! lookup, so the store is abstracted behind `ConnectionProvider`.

use std::collections::HashMap;

use crate::connection::Connection;
use crate::error::{HookError, Result};

/// Source of named connections
pub trait ConnectionProvider: Send + Sync {
    /// Looks up the connection stored under `conn_id`
    fn get_connection(&self, conn_id: &str) -> Result<Connection>;
}

/// In-memory connection store
#[derive(Debug, Clone, Default)]
pub struct StaticConnectionProvider {
    connections: HashMap<String, Connection>,
}

impl StaticConnectionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a connection
    pub fn with_connection(mut self, conn_id: impl Into<String>, connection: Connection) -> Self {
        self.connections.insert(conn_id.into(), connection);
        self
    }
}

impl ConnectionProvider for StaticConnectionProvider {
    fn get_connection(&self, conn_id: &str) -> Result<Connection> {
        self.connections
            .get(conn_id)
            .cloned()
            .ok_or_else(|| HookError::UnknownConnection(conn_id.to_string()))
    }
}

/// Reads connections from environment variables
///
/// A connection with id `pdi_default` is read from `CARTE_CONN_PDI_DEFAULT`
/// (prefix + id upper-cased, `-` and `.` mapped to `_`). The value is the
/// connection as JSON:
///
/// ```text
/// {"host":"carte.local","port":8081,"login":"admin","password":"admin",
///  "extra":{"rep":"etl","carte_username":"cluster","carte_password":"cluster"}}
/// ```
#[derive(Debug, Clone)]
pub struct EnvConnectionProvider {
    prefix: String,
    lookup: fn(&str) -> Option<String>,
}

impl EnvConnectionProvider {
    pub const DEFAULT_PREFIX: &'static str = "CARTE_CONN_";

    pub fn new() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_lookup(prefix, |name| std::env::var(name).ok())
    }

    /// Reads variables through `lookup` instead of the process environment
    pub fn with_lookup(prefix: impl Into<String>, lookup: fn(&str) -> Option<String>) -> Self {
        Self {
            prefix: prefix.into(),
            lookup,
        }
    }

    /// Environment variable holding the connection `conn_id`
    pub fn variable_name(&self, conn_id: &str) -> String {
        let suffix: String = conn_id
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for EnvConnectionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionProvider for EnvConnectionProvider {
    fn get_connection(&self, conn_id: &str) -> Result<Connection> {
        let raw = (self.lookup)(&self.variable_name(conn_id))
            .ok_or_else(|| HookError::UnknownConnection(conn_id.to_string()))?;

        Connection::from_json(conn_id, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_lookup() {
        let connection = Connection {
            host: Some("carte.local".to_string()),
            ..Default::default()
        };
        let provider = StaticConnectionProvider::new().with_connection("pdi", connection.clone());

        assert_eq!(provider.get_connection("pdi").unwrap(), connection);
        assert!(matches!(
            provider.get_connection("other"),
            Err(HookError::UnknownConnection(id)) if id == "other"
        ));
    }

    #[test]
    fn test_variable_name() {
        let provider = EnvConnectionProvider::new();
        assert_eq!(provider.variable_name("pdi_default"), "CARTE_CONN_PDI_DEFAULT");
        assert_eq!(provider.variable_name("prod-carte.eu"), "CARTE_CONN_PROD_CARTE_EU");
    }

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "CARTE_CONN_PDI" => Some(
                r#"{"host":"carte.local","port":8081,"extra":{"carte_username":"cluster"}}"#
                    .to_string(),
            ),
            "CARTE_CONN_BROKEN" => Some("http://carte.local:8081".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_env_provider_reads_json() {
        let provider = EnvConnectionProvider::with_lookup("CARTE_CONN_", fake_env);

        let connection = provider.get_connection("pdi").unwrap();
        assert_eq!(connection.host.as_deref(), Some("carte.local"));
        assert_eq!(connection.port, Some(8081));
    }

    #[test]
    fn test_env_provider_missing_variable() {
        let provider = EnvConnectionProvider::with_lookup("CARTE_CONN_", fake_env);
        assert!(matches!(
            provider.get_connection("other"),
            Err(HookError::UnknownConnection(_))
        ));
    }

    #[test]
    fn test_env_provider_malformed_value() {
        let provider = EnvConnectionProvider::with_lookup("CARTE_CONN_", fake_env);
        assert!(matches!(
            provider.get_connection("broken"),
            Err(HookError::MalformedConnection { .. })
        ));
    }
}
