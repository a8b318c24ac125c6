//! Stored connection records
//!
//! A `Connection` is what an external connection store hands back for a
//! connection id. Carte-specific settings live in `extra`.

use carte_core::domain::connection::{ConnectionConfig, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HookError, Result};

/// A named connection as kept by the orchestrator
///
/// `extra` holds a JSON object (or a string containing one) with the keys
/// `rep`, `carte_username` and `carte_password`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Repository user jobs run as
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub extra: Value,
}

impl Connection {
    /// Parses a connection stored as JSON
    pub fn from_json(conn_id: &str, raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| HookError::MalformedConnection {
            conn_id: conn_id.to_string(),
            source,
        })
    }

    /// `extra` as a JSON object
    ///
    /// A string holding JSON is decoded first; a missing `extra` is empty.
    pub fn extra_json(&self, conn_id: &str) -> Result<Map<String, Value>> {
        match &self.extra {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map.clone()),
            Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Value::String(raw) => match serde_json::from_str(raw) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err(HookError::invalid(conn_id, "extra must be a JSON object")),
                Err(source) => Err(HookError::MalformedConnection {
                    conn_id: conn_id.to_string(),
                    source,
                }),
            },
            _ => Err(HookError::invalid(conn_id, "extra must be a JSON object")),
        }
    }

    /// Builds the settings a Carte client is bound to
    ///
    /// # Arguments
    /// * `conn_id` - Id the connection was resolved under, used in errors
    /// * `level` - Logging level to record on the settings
    pub fn to_config(&self, conn_id: &str, level: LogLevel) -> Result<ConnectionConfig> {
        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| HookError::invalid(conn_id, "host is missing"))?;

        let port = self
            .port
            .ok_or_else(|| HookError::invalid(conn_id, "port is missing"))?;

        let extra = self.extra_json(conn_id)?;
        let carte_username = extra_string(&extra, "carte_username")
            .ok_or_else(|| HookError::invalid(conn_id, "extra.carte_username is missing"))?;

        let config = ConnectionConfig::new(host, port)
            .with_repository(extra_string(&extra, "rep").unwrap_or_default())
            .with_run_credentials(
                self.login.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            )
            .with_carte_credentials(
                carte_username,
                extra_string(&extra, "carte_password").unwrap_or_default(),
            )
            .with_log_level(level);

        config
            .validate()
            .map_err(|source| HookError::InvalidConfig {
                conn_id: conn_id.to_string(),
                source,
            })?;

        Ok(config)
    }
}

/// Reads a scalar `extra` entry as a string
fn extra_string(extra: &Map<String, Value>, key: &str) -> Option<String> {
    match extra.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carte_core::domain::connection::ConfigError;
    use serde_json::json;
    use std::error::Error;

    fn connection() -> Connection {
        Connection {
            host: Some("carte.local".to_string()),
            port: Some(8081),
            login: Some("admin".to_string()),
            password: Some("secret".to_string()),
            extra: json!({
                "rep": "etl-repo",
                "carte_username": "cluster",
                "carte_password": "cluster-pass"
            }),
        }
    }

    #[test]
    fn test_to_config_maps_every_field() {
        let config = connection().to_config("pdi", LogLevel::Debug).unwrap();

        assert_eq!(config.host, "carte.local");
        assert_eq!(config.port, 8081);
        assert_eq!(config.repository, "etl-repo");
        assert_eq!(config.run_username, "admin");
        assert_eq!(config.run_password, "secret");
        assert_eq!(config.carte_username, "cluster");
        assert_eq!(config.carte_password, "cluster-pass");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_extra_as_json_string() {
        let mut conn = connection();
        conn.extra = Value::String(r#"{"carte_username":"cluster","rep":"r"}"#.to_string());

        let config = conn.to_config("pdi", LogLevel::Basic).unwrap();
        assert_eq!(config.repository, "r");
        assert_eq!(config.carte_password, "");
    }

    #[test]
    fn test_missing_host_is_rejected() {
        let mut conn = connection();
        conn.host = None;

        let err = conn.to_config("pdi", LogLevel::Basic).unwrap_err();
        assert_eq!(err.to_string(), "Connection pdi is invalid: host is missing");
    }

    #[test]
    fn test_blank_host_fails_validation() {
        let mut conn = connection();
        conn.host = Some("   ".to_string());

        let err = conn.to_config("pdi", LogLevel::Basic).unwrap_err();
        assert!(matches!(
            err,
            HookError::InvalidConfig {
                source: ConfigError::EmptyHost,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_port_is_rejected() {
        let mut conn = connection();
        conn.port = None;
        assert!(matches!(
            conn.to_config("pdi", LogLevel::Basic),
            Err(HookError::InvalidConnection { .. })
        ));
    }

    #[test]
    fn test_zero_port_keeps_config_error_as_source() {
        let mut conn = connection();
        conn.port = Some(0);

        let err = conn.to_config("pdi", LogLevel::Basic).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connection pdi has invalid settings: port must be greater than 0"
        );

        let source = err
            .source()
            .and_then(|s| s.downcast_ref::<ConfigError>())
            .unwrap();
        assert_eq!(source, &ConfigError::ZeroPort);
    }

    #[test]
    fn test_missing_carte_username_is_rejected() {
        let mut conn = connection();
        conn.extra = json!({ "rep": "etl-repo" });

        let err = conn.to_config("pdi", LogLevel::Basic).unwrap_err();
        assert!(matches!(err, HookError::InvalidConnection { .. }));
    }

    #[test]
    fn test_extra_must_be_an_object() {
        let mut conn = connection();
        conn.extra = json!(["rep"]);
        assert!(conn.extra_json("pdi").is_err());

        conn.extra = Value::String("not json".to_string());
        assert!(matches!(
            conn.extra_json("pdi"),
            Err(HookError::MalformedConnection { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let conn = Connection::from_json(
            "pdi",
            r#"{"host":"carte.local","port":8081,"extra":{"carte_username":"cluster"}}"#,
        )
        .unwrap();

        assert_eq!(conn.host.as_deref(), Some("carte.local"));
        assert_eq!(conn.login, None);
        assert!(Connection::from_json("pdi", "{").is_err());
    }
}
