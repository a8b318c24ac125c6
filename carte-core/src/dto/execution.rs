//! Execution DTOs
//!
//! Describes what to launch on Carte and how it maps onto query parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::connection::ConnectionConfig;
use crate::domain::response::{JOB_STATUS_ROOT, TRANS_STATUS_ROOT};

/// Logging level sent with every execution unless the caller overrides `level`
pub const DEFAULT_EXECUTION_LEVEL: &str = "Debug";

/// The two kinds of work Carte executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionKind {
    Job,
    Transformation,
}

impl ExecutionKind {
    /// Endpoint that launches an execution
    pub fn execute_path(&self) -> &'static str {
        match self {
            ExecutionKind::Job => "/kettle/executeJob/",
            ExecutionKind::Transformation => "/kettle/executeTrans/",
        }
    }

    /// Endpoint that reports execution status
    pub fn status_path(&self) -> &'static str {
        match self {
            ExecutionKind::Job => "/kettle/jobStatus/",
            ExecutionKind::Transformation => "/kettle/transStatus/",
        }
    }

    /// Query parameter naming the repository path to run
    pub fn target_param(&self) -> &'static str {
        match self {
            ExecutionKind::Job => "job",
            ExecutionKind::Transformation => "trans",
        }
    }

    /// Root element of the status document for this kind
    pub fn status_root(&self) -> &'static str {
        match self {
            ExecutionKind::Job => JOB_STATUS_ROOT,
            ExecutionKind::Transformation => TRANS_STATUS_ROOT,
        }
    }
}

impl std::fmt::Display for ExecutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionKind::Job => write!(f, "job"),
            ExecutionKind::Transformation => write!(f, "transformation"),
        }
    }
}

/// Request to run a job or transformation stored in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub kind: ExecutionKind,
    /// Repository path, e.g. `/home/etl/job1`
    pub target_path: String,
    /// Extra query parameters; these win over the defaults on key collision
    pub extra_params: BTreeMap<String, String>,
}

impl ExecutionRequest {
    pub fn new(kind: ExecutionKind, target_path: impl Into<String>) -> Self {
        Self {
            kind,
            target_path: target_path.into(),
            extra_params: BTreeMap::new(),
        }
    }

    pub fn job(job_path: impl Into<String>) -> Self {
        Self::new(ExecutionKind::Job, job_path)
    }

    pub fn transformation(trans_path: impl Into<String>) -> Self {
        Self::new(ExecutionKind::Transformation, trans_path)
    }

    /// Adds a single extra parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// Adds every parameter from `params`
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds the query string pairs for the execute endpoint
    ///
    /// Defaults come first in a fixed order (`user`, `pass`, `rep`, the
    /// target, `level`); an extra parameter with the same key replaces the
    /// default in place, any other extra parameter is appended.
    pub fn query_params(&self, config: &ConnectionConfig) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("user".to_string(), config.run_username.clone()),
            ("pass".to_string(), config.run_password.clone()),
            ("rep".to_string(), config.repository.clone()),
            (
                self.kind.target_param().to_string(),
                self.target_path.clone(),
            ),
            ("level".to_string(), DEFAULT_EXECUTION_LEVEL.to_string()),
        ];

        for (key, value) in &self.extra_params {
            match params.iter_mut().find(|(existing, _)| existing == key) {
                Some(slot) => slot.1 = value.clone(),
                None => params.push((key.clone(), value.clone())),
            }
        }

        params
    }
}
