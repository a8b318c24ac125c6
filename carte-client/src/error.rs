//! Error types for the Carte client

use carte_core::domain::response::{CarteResponse, WebResult};
use carte_core::xml::XmlError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Carte client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (DNS, connection refused, timeout, broken body)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Carte answered with a status of 400 or above
    #[error("{detail}")]
    Execution {
        /// HTTP status code
        status: u16,
        /// What the server said about the failure
        detail: ExecutionDetail,
    },

    /// A success body was not a well-formed XML document
    #[error("Failed to parse response: {0}")]
    Parse(#[from] XmlError),
}

/// Payload of an execution error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionDetail {
    /// The error body was a `webresult` document
    WebResult(WebResult),
    /// The error body could not be read as a `webresult` document
    RawBody(String),
}

impl std::fmt::Display for ExecutionDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionDetail::WebResult(result) => write!(f, "{}", result),
            ExecutionDetail::RawBody(body) => write!(f, "{}", body),
        }
    }
}

impl ClientError {
    /// Classify an error response body
    ///
    /// The body is read as a `webresult` document when possible and kept
    /// verbatim otherwise.
    pub fn execution(status: u16, body: &str) -> Self {
        let detail = CarteResponse::from_xml(body)
            .ok()
            .and_then(|response| response.web_result())
            .map(ExecutionDetail::WebResult)
            .unwrap_or_else(|| ExecutionDetail::RawBody(body.to_string()));

        Self::Execution { status, detail }
    }

    /// HTTP status of an execution error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Execution { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) => None,
        }
    }

    /// Parsed `webresult` of an execution error, if the server sent one
    pub fn web_result(&self) -> Option<&WebResult> {
        match self {
            Self::Execution {
                detail: ExecutionDetail::WebResult(result),
                ..
            } => Some(result),
            _ => None,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Execution { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Execution { status, .. } if *status >= 500)
    }
}
