//! Job endpoints

use crate::CarteClient;
use crate::error::Result;
use carte_core::domain::response::CarteResponse;
use carte_core::dto::execution::ExecutionRequest;
use carte_core::dto::status::StatusQuery;
use std::collections::HashMap;

impl CarteClient {
    // =============================================================================
    // Job Execution
    // =============================================================================

    /// Run a job stored in the repository
    ///
    /// # Arguments
    /// * `job_path` - Repository path of the job (e.g. `/home/etl/job1`)
    /// * `params` - Extra query parameters; they override the defaults
    ///   (`user`, `pass`, `rep`, `job`, `level`) on key collision
    ///
    /// # Returns
    /// The decoded `webresult`, whose `id` identifies the new execution
    ///
    /// # Example
    /// ```no_run
    /// # use carte_client::{CarteClient, ConnectionConfig};
    /// # use std::collections::HashMap;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = CarteClient::new(ConnectionConfig::new("localhost", 8081));
    /// let params = HashMap::from([("date".to_string(), "2024-01-31".to_string())]);
    /// let response = client.run_job("/home/etl/job1", Some(&params)).await?;
    /// println!("started {:?}", response.id());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_job(
        &self,
        job_path: &str,
        params: Option<&HashMap<String, String>>,
    ) -> Result<CarteResponse> {
        let mut request = ExecutionRequest::job(job_path);
        if let Some(params) = params {
            request = request.with_params(params.clone());
        }

        self.execute(&request).await
    }

    // =============================================================================
    // Job Status
    // =============================================================================

    /// Get the status of a job execution
    ///
    /// # Arguments
    /// * `job_name` - Job name as known to Carte
    /// * `job_id` - Execution id returned by [`CarteClient::run_job`]
    /// * `previous` - The previous status response, so logs resume after
    ///   its `last_log_line_nr`; `None` reads from line 0
    ///
    /// # Returns
    /// The decoded `jobstatus` document
    pub async fn job_status(
        &self,
        job_name: &str,
        job_id: &str,
        previous: Option<&CarteResponse>,
    ) -> Result<CarteResponse> {
        self.status(&StatusQuery::job(job_name, job_id, previous)).await
    }
}
