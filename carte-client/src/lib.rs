//! Carte HTTP Client
//!
//! A small client for launching and polling jobs and transformations on a
//! Carte server.
//!
//! Every operation issues exactly one HTTP request, authenticated with the
//! Carte server credentials (HTTP Basic), and decodes the XML answer into a
//! [`CarteResponse`]. Status codes of 400 and above become
//! [`ClientError::Execution`]. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use carte_client::CarteClient;
//! use carte_core::domain::connection::ConnectionConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConnectionConfig::new("localhost", 8081)
//!         .with_repository("etl")
//!         .with_run_credentials("admin", "admin")
//!         .with_carte_credentials("cluster", "cluster");
//!     let client = CarteClient::new(config);
//!
//!     let launched = client.run_job("/home/etl/job1", None).await?;
//!     let job_id = launched.id().unwrap_or_default().to_string();
//!
//!     let status = client.job_status("job1", &job_id, None).await?;
//!     let next = client.job_status("job1", &job_id, Some(&status)).await?;
//!     println!("{:?}", next.status_record());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod transformations;

// Re-export commonly used types
pub use carte_core::domain::connection::{ConnectionConfig, LogLevel};
pub use carte_core::domain::response::{CarteResponse, StatusRecord, WebResult};
pub use error::{ClientError, ExecutionDetail, Result};

use carte_core::dto::execution::ExecutionRequest;
use carte_core::dto::status::StatusQuery;
use reqwest::Client;
use tracing::{debug, warn};

/// HTTP client for a single Carte server
///
/// Holds the immutable connection settings and a `reqwest` client. Calls
/// share no mutable state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct CarteClient {
    /// Connection settings this client is bound to
    config: ConnectionConfig,
    /// Base URL of the server (e.g., "http://localhost:8081")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl CarteClient {
    /// Create a new Carte client
    ///
    /// # Example
    /// ```
    /// use carte_client::{CarteClient, ConnectionConfig};
    ///
    /// let client = CarteClient::new(ConnectionConfig::new("localhost", 8081));
    /// assert_eq!(client.base_url(), "http://localhost:8081");
    /// ```
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create a new Carte client with a custom HTTP client
    ///
    /// The default client blocks until the server answers. Use this to set
    /// connect/read timeouts, proxies, etc.
    ///
    /// # Example
    /// ```
    /// use carte_client::{CarteClient, ConnectionConfig};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CarteClient::with_client(ConnectionConfig::new("localhost", 8081), http_client);
    /// ```
    pub fn with_client(config: ConnectionConfig, client: Client) -> Self {
        Self {
            base_url: config.base_url(),
            config,
            client,
        }
    }

    /// Get the connection settings of this client
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get the base URL of the Carte server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Generic Operations
    // =============================================================================

    /// Launch a job or transformation
    ///
    /// Sends a GET to the kind's execute endpoint with the merged query
    /// parameters of `request`.
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<CarteResponse> {
        let url = format!("{}{}", self.base_url, request.kind.execute_path());
        debug!(
            kind = %request.kind,
            target = %request.target_path,
            url = %url,
            "Launching execution on Carte"
        );

        let response = self
            .client
            .get(&url)
            .query(&request.query_params(&self.config))
            .basic_auth(&self.config.carte_username, Some(&self.config.carte_password))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Query the status of a job or transformation
    ///
    /// Sends a form-encoded POST to the kind's status endpoint.
    pub async fn status(&self, query: &StatusQuery) -> Result<CarteResponse> {
        let url = format!("{}{}", self.base_url, query.kind.status_path());
        debug!(
            kind = %query.kind,
            name = %query.name,
            from = query.from_log_line,
            url = %url,
            "Querying execution status on Carte"
        );

        let response = self
            .client
            .post(&url)
            .form(&query.form_fields())
            .basic_auth(&self.config.carte_username, Some(&self.config.carte_password))
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a Carte response and decode its XML body
    ///
    /// Statuses of 400 and above are turned into execution errors whatever
    /// the body holds, even when it cannot be read; anything else must
    /// decode as XML.
    async fn handle_response(&self, response: reqwest::Response) -> Result<CarteResponse> {
        let status = response.status();

        if status.as_u16() >= 400 {
            // The query string carries the run password; log the path only
            let path = response.url().path().to_string();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), path = %path, "Carte returned an error status");
            return Err(ClientError::execution(status.as_u16(), &body));
        }

        let body = response.text().await?;
        Ok(CarteResponse::from_xml(&body)?)
    }
}
