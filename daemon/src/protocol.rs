use serde::{Deserialize, Serialize};

use crate::orchestrator::{SessionSnapshot, SessionUpdate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: RequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    /// The client's text box changed.
    Input { text: String },
    /// The user picked one of the offered words.
    Accept { word: String },
    /// One-shot computation, no debounce, session untouched.
    Suggest { text: String },
    Snapshot,
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl DaemonResponse {
    pub fn new(id: impl Into<String>, body: ResponseBody) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBody {
    Ack,
    Accepted { text: String },
    Snapshot(SessionSnapshot),
    Busy { sequence: u64 },
    Suggestions(SuggestionsResponse),
    Pong,
    Error(ErrorResponse),
}

/// `sequence` is absent for one-shot `suggest` replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    pub text: String,
    pub suggestions: Vec<String>,
}

impl From<SessionUpdate> for ResponseBody {
    fn from(update: SessionUpdate) -> Self {
        match update {
            SessionUpdate::Busy { sequence } => ResponseBody::Busy { sequence },
            SessionUpdate::Suggestions {
                sequence,
                text,
                suggestions,
            } => ResponseBody::Suggestions(SuggestionsResponse {
                sequence: Some(sequence),
                text,
                suggestions,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Timeout,
}
