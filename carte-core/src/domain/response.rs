//! Response domain types
//!
//! Every Carte answer is kept as a generic element tree (`CarteResponse`),
//! with typed views for the two document shapes callers act on: status
//! records (`jobstatus` / `transstatus`) and `webresult` envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::xml::{self, XmlElement, XmlError};

/// Root element of a job status document
pub const JOB_STATUS_ROOT: &str = "jobstatus";

/// Root element of a transformation status document
pub const TRANS_STATUS_ROOT: &str = "transstatus";

/// Root element of a result/error envelope
pub const WEB_RESULT_ROOT: &str = "webresult";

/// A decoded Carte response document
///
/// Unknown elements and attributes are preserved; the typed accessors only
/// read what they need from the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarteResponse {
    root: XmlElement,
}

impl CarteResponse {
    /// Decodes a response body
    pub fn from_xml(body: &str) -> Result<Self, XmlError> {
        xml::parse(body).map(Self::from_element)
    }

    pub fn from_element(root: XmlElement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Name of the document's root element (e.g. `jobstatus`)
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Looks up an element below the root by `/`-separated path
    pub fn get(&self, path: &str) -> Option<&XmlElement> {
        self.root.find(path)
    }

    /// Text of the element at `path`, relative to the root
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(XmlElement::text)
    }

    /// Identifier reported by the server
    ///
    /// `executeJob` answers with a webresult carrying the new job's `id`,
    /// status documents carry it as well.
    pub fn id(&self) -> Option<&str> {
        self.text("id")
    }

    /// Last log line the server has handed out so far
    ///
    /// Returns `None` when the document carries no readable `last_log_line_nr`.
    pub fn last_log_line_number(&self) -> Option<u64> {
        parse_number(self.text("last_log_line_nr"))
    }

    /// Typed view over a `jobstatus` or `transstatus` document
    pub fn status_record(&self) -> Option<StatusRecord> {
        let name_field = match self.root_name() {
            JOB_STATUS_ROOT => "jobname",
            TRANS_STATUS_ROOT => "transname",
            _ => return None,
        };

        let status = self
            .text("status_desc")
            .or_else(|| self.text("status"))
            .unwrap_or_default()
            .to_string();

        Some(StatusRecord {
            name: self.text(name_field).map(str::to_string),
            id: self.id().map(str::to_string),
            status,
            first_log_line_number: parse_number(self.text("first_log_line_nr")),
            last_log_line_number: self.last_log_line_number().unwrap_or(0),
            log_text: self.text("logging_string").unwrap_or_default().to_string(),
            error_description: self
                .text("error_desc")
                .filter(|desc| !desc.trim().is_empty())
                .map(str::to_string),
            error_count: parse_number(self.text("result/nr_errors")),
        })
    }

    /// Typed view over a `webresult` document
    pub fn web_result(&self) -> Option<WebResult> {
        WebResult::from_element(&self.root)
    }

    /// JSON rendering keyed by the root element name
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(self.root.name.clone(), self.root.to_json());
        Value::Object(map)
    }
}

fn parse_number(text: Option<&str>) -> Option<u64> {
    text.and_then(|t| t.trim().parse().ok())
}

/// Status of a job or transformation as reported by Carte
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub name: Option<String>,
    pub id: Option<String>,
    /// Status description, e.g. "Running" or "Finished (with errors)"
    pub status: String,
    pub first_log_line_number: Option<u64>,
    pub last_log_line_number: u64,
    /// Log text since the requested line, exactly as the server sent it
    pub log_text: String,
    pub error_description: Option<String>,
    pub error_count: Option<u64>,
}

impl StatusRecord {
    /// Whether the execution reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.status.starts_with("Finished") || self.status.starts_with("Stopped")
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.status.as_str(),
            "Running" | "Initializing" | "Preparing executing" | "Halting" | "Paused"
        )
    }

    pub fn has_errors(&self) -> bool {
        self.status.contains("with errors")
            || self.error_count.is_some_and(|count| count > 0)
            || self.error_description.is_some()
    }
}

/// Result envelope returned by Carte for executions and errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    /// Result code, "OK" or "ERROR"
    pub result: String,
    pub message: String,
    pub id: Option<String>,
}

impl WebResult {
    /// Reads a `webresult` root element
    ///
    /// Returns `None` for any other document.
    pub fn from_element(root: &XmlElement) -> Option<Self> {
        if root.name != WEB_RESULT_ROOT {
            return None;
        }

        let field = |name: &str| {
            root.child(name)
                .and_then(XmlElement::text)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            result: field("result"),
            message: field("message"),
            id: root
                .child("id")
                .and_then(XmlElement::text)
                .map(str::to_string),
        })
    }

    pub fn is_ok(&self) -> bool {
        self.result.eq_ignore_ascii_case("OK")
    }
}

impl std::fmt::Display for WebResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.result, self.message)
    }
}
