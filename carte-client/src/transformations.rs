//! Transformation endpoints

use crate::CarteClient;
use crate::error::Result;
use carte_core::domain::response::CarteResponse;
use carte_core::dto::execution::ExecutionRequest;
use carte_core::dto::status::StatusQuery;
use std::collections::HashMap;

impl CarteClient {
    /// Run a transformation stored in the repository
    ///
    /// # Arguments
    /// * `trans_path` - Repository path of the transformation
    /// * `params` - Extra query parameters; they override the defaults
    ///   (`user`, `pass`, `rep`, `trans`, `level`) on key collision
    pub async fn run_trans(
        &self,
        trans_path: &str,
        params: Option<&HashMap<String, String>>,
    ) -> Result<CarteResponse> {
        let mut request = ExecutionRequest::transformation(trans_path);
        if let Some(params) = params {
            request = request.with_params(params.clone());
        }

        self.execute(&request).await
    }

    /// Get the status of a transformation
    ///
    /// Transformations are identified by name only.
    pub async fn trans_status(
        &self,
        trans_name: &str,
        previous: Option<&CarteResponse>,
    ) -> Result<CarteResponse> {
        self.status(&StatusQuery::transformation(trans_name, previous)).await
    }
}
