//! Client library for the Chaoxing (学习通) learning portal: authenticated
//! session, course enumeration, and the concurrent in-progress activity scan.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub mod config;
pub mod courses;
pub mod deadline;
pub mod http_client;
pub mod markup;
pub mod orchestrator;
pub mod scan;
pub mod status;

#[derive(Debug, Error)]
pub enum ChaoxingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// One course from the portal listing. Identity is `(course_id, class_id)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Course {
    pub name: String,
    pub course_id: String,
    pub class_id: String,
}

/// Activity categories the mobile platform tags with a numeric type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    CheckIn,
    GroupTask,
    Quiz,
    Other,
}

impl ActivityKind {
    /// Map a numeric type code string extracted from the widget markup.
    /// Codes without a known meaning collapse into [`ActivityKind::Other`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "2" => Self::CheckIn,
            "35" => Self::GroupTask,
            "42" => Self::Quiz,
            _ => Self::Other,
        }
    }
}

/// Completion state of one activity for the logged-in user.
///
/// `Unknown` doubles as the empty status: group tasks carry it always, and
/// every degraded lookup falls back to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivityStatus {
    Signed,
    NotSigned,
    Submitted,
    NotSubmitted,
    #[default]
    Unknown,
}

impl ActivityStatus {
    /// Short portal-style text for the status; `Unknown` renders as nothing.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Signed => "已签",
            Self::NotSigned => "未签",
            Self::Submitted => "已交",
            Self::NotSubmitted => "未交",
            Self::Unknown => "",
        }
    }
}

/// One in-progress activity extracted during a single course scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    pub type_label: String,
    pub name: String,
    pub active_id: Option<String>,
    pub kind: ActivityKind,
    pub time_info: String,
    pub status: ActivityStatus,
}

/// Scan result for one course that had at least one in-progress activity.
/// A course with nothing in progress yields no report at all, never a report
/// with an empty activity list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseReport {
    pub course_name: String,
    pub activities: Vec<Activity>,
}

/// Envelope shared by the mobilelearn `/v2/apis/*` endpoints.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct V2Response {
    #[serde(default)]
    pub result: i64,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl V2Response {
    /// The payload of a successful envelope.
    ///
    /// The platform treats `result == 1` with a non-empty `data` as success;
    /// null, false, 0, "", [] and {} all count as empty.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match &self.data {
            Some(v) if self.result == 1 && value_is_nonempty(v) => Some(v),
            _ => None,
        }
    }
}

fn value_is_nonempty(v: &serde_json::Value) -> bool {
    use serde_json::Value;
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Remote surface of the portal used by the scan pipeline.
///
/// The session established by [`login`](Self::login) lives in the client and
/// is shared read-only by all concurrent scan workers afterwards; no other
/// method mutates authentication state.
#[async_trait]
pub trait ChaoxingClient: Send + Sync + 'static {
    /// Authenticate the session. A failure here is fatal for the whole run.
    async fn login(&self, phone: &str, password: &SecretString) -> Result<(), ChaoxingError>;

    /// Raw HTML of the course listing.
    async fn course_list_page(&self) -> Result<String, ChaoxingError>;

    /// Raw HTML of a course's in-progress activity widget.
    async fn activity_page(
        &self,
        course_id: &str,
        class_id: &str,
    ) -> Result<String, ChaoxingError>;

    /// Quiz answer-result lookup.
    async fn answer_result(&self, active_id: &str) -> Result<V2Response, ChaoxingError>;

    /// Check-in state lookup.
    async fn sign_state(&self, active_id: &str) -> Result<V2Response, ChaoxingError>;

    /// Activity deadline lookup.
    async fn active_end_time(&self, active_id: &str) -> Result<V2Response, ChaoxingError>;
}
