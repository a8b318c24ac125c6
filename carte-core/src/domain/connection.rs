//! Connection domain types
//!
//! Settings a Carte client is bound to for its whole lifetime.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by invalid connection settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("host cannot be empty")]
    EmptyHost,

    #[error("port must be greater than 0")]
    ZeroPort,

    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
}

/// Connection settings for a single Carte server
///
/// Two sets of credentials live here: the run-as user sent as payload fields
/// on execution requests, and the Carte server account used for HTTP Basic
/// authentication on every request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Carte host name or address
    pub host: String,

    /// Carte HTTP port
    pub port: u16,

    /// Repository holding the job and transformation definitions
    pub repository: String,

    /// Repository user the job or transformation runs as
    pub run_username: String,

    /// Password of the run-as user
    pub run_password: String,

    /// Carte server account (HTTP Basic)
    pub carte_username: String,

    /// Carte server password (HTTP Basic)
    pub carte_password: String,

    /// Logging level requested for the hook's executions
    pub log_level: LogLevel,
}

impl ConnectionConfig {
    /// Creates a new configuration with empty credentials and the default level
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            repository: String::new(),
            run_username: String::new(),
            run_password: String::new(),
            carte_username: String::new(),
            carte_password: String::new(),
            log_level: LogLevel::default(),
        }
    }

    /// Sets the repository name sent as `rep`
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Sets the run-as credentials sent as `user` / `pass`
    pub fn with_run_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.run_username = username.into();
        self.run_password = password.into();
        self
    }

    /// Sets the Carte server credentials used for HTTP Basic authentication
    pub fn with_carte_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.carte_username = username.into();
        self.carte_password = password.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Base URL of the server, e.g. `http://localhost:8081`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }

        Ok(())
    }
}

// Passwords are never printed
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("repository", &self.repository)
            .field("run_username", &self.run_username)
            .field("run_password", &"<redacted>")
            .field("carte_username", &self.carte_username)
            .field("carte_password", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Kettle logging levels understood by Carte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Nothing,
    Error,
    Minimal,
    #[default]
    Basic,
    Detailed,
    Debug,
    Rowlevel,
}

impl LogLevel {
    /// Spelling used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Nothing => "Nothing",
            LogLevel::Error => "Error",
            LogLevel::Minimal => "Minimal",
            LogLevel::Basic => "Basic",
            LogLevel::Detailed => "Detailed",
            LogLevel::Debug => "Debug",
            LogLevel::Rowlevel => "Rowlevel",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nothing" => Ok(LogLevel::Nothing),
            "error" => Ok(LogLevel::Error),
            "minimal" => Ok(LogLevel::Minimal),
            "basic" => Ok(LogLevel::Basic),
            "detailed" => Ok(LogLevel::Detailed),
            "debug" => Ok(LogLevel::Debug),
            "rowlevel" => Ok(LogLevel::Rowlevel),
            other => Err(ConfigError::UnknownLogLevel(other.to_string())),
        }
    }
}
