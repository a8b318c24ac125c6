//! Carte hook
//!
//! Resolves one named connection and owns the client built for it.

use std::sync::OnceLock;

use carte_client::CarteClient;
use carte_core::domain::connection::{ConnectionConfig, LogLevel};
use tracing::info;

use crate::error::Result;
use crate::provider::ConnectionProvider;

/// Connection id used when none is given
pub const DEFAULT_CONN_ID: &str = "pdi_default";

/// Orchestrator hook for a single Carte connection
///
/// The connection is resolved when the hook is created. The client is built
/// on the first call to [`CarteHook::get_conn`] and reused afterwards; each
/// hook owns its own client.
#[derive(Debug)]
pub struct CarteHook {
    conn_id: String,
    config: ConnectionConfig,
    client: OnceLock<CarteClient>,
}

impl CarteHook {
    /// Creates a hook for `conn_id`
    ///
    /// # Arguments
    /// * `provider` - Connection store to resolve `conn_id` from
    /// * `conn_id` - Id of the stored connection
    /// * `level` - Logging level recorded on the connection settings
    pub fn new(provider: &dyn ConnectionProvider, conn_id: &str, level: LogLevel) -> Result<Self> {
        let connection = provider.get_connection(conn_id)?;
        let config = connection.to_config(conn_id, level)?;

        Ok(Self {
            conn_id: conn_id.to_string(),
            config,
            client: OnceLock::new(),
        })
    }

    /// Creates a hook for [`DEFAULT_CONN_ID`] at the default level
    pub fn with_default_connection(provider: &dyn ConnectionProvider) -> Result<Self> {
        Self::new(provider, DEFAULT_CONN_ID, LogLevel::default())
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    /// Settings resolved for this hook's connection
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns this hook's client, building it on first use
    pub fn get_conn(&self) -> &CarteClient {
        self.client.get_or_init(|| {
            info!(
                conn_id = %self.conn_id,
                host = %self.config.host,
                port = self.config.port,
                level = %self.config.log_level,
                "Creating Carte client"
            );
            CarteClient::new(self.config.clone())
        })
    }
}
