//! Status query DTOs
//!
//! Carte hands out execution logs incrementally. Each status call names the
//! first line it wants; callers thread the previous response through so the
//! next call resumes where the last one stopped.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::response::CarteResponse;
use crate::dto::execution::ExecutionKind;

/// Request for the status of a running or finished execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    pub kind: ExecutionKind,
    pub name: String,
    /// Carte execution id (jobs only)
    pub id: Option<String>,
    /// First log line to return
    pub from_log_line: u64,
}

impl StatusQuery {
    /// Status query for a job
    ///
    /// # Arguments
    /// * `name` - Job name as known to Carte
    /// * `id` - Execution id returned when the job was launched
    /// * `previous` - Response of the previous status call, if any
    pub fn job(
        name: impl Into<String>,
        id: impl Into<String>,
        previous: Option<&CarteResponse>,
    ) -> Self {
        Self {
            kind: ExecutionKind::Job,
            name: name.into(),
            id: Some(id.into()),
            from_log_line: resume_line(ExecutionKind::Job, previous),
        }
    }

    /// Status query for a transformation
    pub fn transformation(name: impl Into<String>, previous: Option<&CarteResponse>) -> Self {
        Self {
            kind: ExecutionKind::Transformation,
            name: name.into(),
            id: None,
            from_log_line: resume_line(ExecutionKind::Transformation, previous),
        }
    }

    /// Form fields for the status endpoint, in wire order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("name", self.name.clone())];
        if let Some(id) = &self.id {
            fields.push(("id", id.clone()));
        }
        fields.push(("xml", "Y".to_string()));
        fields.push(("from", self.from_log_line.to_string()));
        fields
    }
}

/// Log line to resume from, given the previous status response
///
/// Only a status document of the same kind carries a usable cursor.
fn resume_line(kind: ExecutionKind, previous: Option<&CarteResponse>) -> u64 {
    let Some(response) = previous else {
        return 0;
    };

    if response.root_name() != kind.status_root() {
        warn!(
            expected = kind.status_root(),
            root = response.root_name(),
            "Previous response is not a {} status, reading logs from line 0",
            kind
        );
        return 0;
    }

    response.last_log_line_number().unwrap_or_else(|| {
        warn!(
            root = response.root_name(),
            "Previous response has no readable last_log_line_nr, reading logs from line 0"
        );
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_with_last_line(root: &str, line: u64) -> CarteResponse {
        CarteResponse::from_xml(&format!(
            "<{root}><status_desc>Running</status_desc><last_log_line_nr>{line}</last_log_line_nr></{root}>"
        ))
        .unwrap()
    }

    #[test]
    fn test_first_poll_starts_at_zero() {
        let query = StatusQuery::job("job1", "abc", None);
        assert_eq!(query.from_log_line, 0);

        let query = StatusQuery::transformation("trans1", None);
        assert_eq!(query.from_log_line, 0);
    }

    #[test]
    fn test_resumes_from_previous_response() {
        let previous = status_with_last_line("jobstatus", 42);
        let query = StatusQuery::job("job1", "abc", Some(&previous));
        assert_eq!(query.from_log_line, 42);

        let previous = status_with_last_line("transstatus", 17);
        let query = StatusQuery::transformation("trans1", Some(&previous));
        assert_eq!(query.from_log_line, 17);
    }

    #[test]
    fn test_status_of_another_kind_is_not_resumed() {
        let job_status = status_with_last_line("jobstatus", 42);
        let query = StatusQuery::transformation("trans1", Some(&job_status));
        assert_eq!(query.from_log_line, 0);

        let trans_status = status_with_last_line("transstatus", 17);
        let query = StatusQuery::job("job1", "abc", Some(&trans_status));
        assert_eq!(query.from_log_line, 0);

        let web_result = CarteResponse::from_xml(
            "<webresult><result>OK</result><last_log_line_nr>5</last_log_line_nr></webresult>",
        )
        .unwrap();
        assert_eq!(StatusQuery::job("job1", "abc", Some(&web_result)).from_log_line, 0);
    }

    #[test]
    fn test_previous_without_cursor_falls_back_to_zero() {
        let previous =
            CarteResponse::from_xml("<jobstatus><status_desc>Waiting</status_desc></jobstatus>")
                .unwrap();

        assert_eq!(StatusQuery::job("job1", "abc", Some(&previous)).from_log_line, 0);
    }

    #[test]
    fn test_job_form_fields() {
        let previous = status_with_last_line("jobstatus", 7);
        let query = StatusQuery::job("job1", "abc", Some(&previous));

        assert_eq!(
            query.form_fields(),
            vec![
                ("name", "job1".to_string()),
                ("id", "abc".to_string()),
                ("xml", "Y".to_string()),
                ("from", "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_transformation_form_fields_have_no_id() {
        let query = StatusQuery::transformation("trans1", None);

        assert_eq!(
            query.form_fields(),
            vec![
                ("name", "trans1".to_string()),
                ("xml", "Y".to_string()),
                ("from", "0".to_string()),
            ]
        );
    }
}
