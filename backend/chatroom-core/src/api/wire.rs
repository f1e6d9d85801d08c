//! Request and response bodies exchanged with both backends.
//!
//! Field names follow the backends (`currentModel`, `toolResults`,
//! `toolName`), so the chat API types use camelCase renames while the
//! retrieval API types are already snake_case.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================
// CHAT API
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    pub models: Vec<String>,
    #[serde(default)]
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolsResponse {
    #[serde(default)]
    pub tools: Option<Vec<ToolDescriptor>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectModelRequest<'a> {
    pub model: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultPayload {
    pub tool_name: String,
    #[serde(default)]
    pub result: Value,
}

impl ToolResultPayload {
    /// Result as display text: strings verbatim, anything else as pretty JSON.
    pub fn result_text(&self) -> String {
        match &self.result {
            Value::String(text) => text.clone(),
            Value::Null => String::new(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default)]
    pub tool_results: Option<Vec<ToolResultPayload>>,
}

// ============================================
// RETRIEVAL API
// ============================================

/// Kind tag attached to memory entries created by hand.
pub const MEMORY_KIND_FACT: &str = "fact";

/// Tag attached to memory entries created from the chat window.
pub const MEMORY_TAG_MANUAL: &str = "manual";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RememberRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: Vec<String>,
    pub domain: String,
    pub user: String,
}

impl RememberRequest {
    /// A manually tagged fact, the only kind the chat window creates.
    pub fn manual_fact(
        text: impl Into<String>,
        domain: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            kind: MEMORY_KIND_FACT.to_string(),
            tag: vec![MEMORY_TAG_MANUAL.to_string()],
            domain: domain.into(),
            user: user.into(),
        }
    }
}

/// Non-file fields sent alongside an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFields {
    pub domain: String,
    pub user_tag: String,
}

/// Answer to an upload, read leniently.
///
/// The ingestion backend's body is loosely typed: counts may come back as
/// floats or strings and the body may be empty. Anything that cannot be read
/// falls back to no error, zero counts and an empty file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadResponse {
    pub error: Option<Value>,
    pub success: u64,
    pub fail: u64,
    pub filename: String,
}

impl UploadResponse {
    /// Read a raw response body; empty or non-JSON bodies yield the defaults.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(Self::from)
            .unwrap_or_default()
    }
}

impl From<Value> for UploadResponse {
    fn from(body: Value) -> Self {
        let Value::Object(fields) = body else {
            return Self::default();
        };

        Self {
            error: fields.get("error").cloned(),
            success: lenient_count(fields.get("success")),
            fail: lenient_count(fields.get("fail")),
            filename: match fields.get("filename") {
                Some(Value::String(name)) => name.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            },
        }
    }
}

/// Non-negative count from a number (integer or float) or numeric string; 0 otherwise.
fn lenient_count(value: Option<&Value>) -> u64 {
    let number = match value {
        Some(Value::Number(number)) => number.as_u64().or_else(|| number.as_f64().map(float_count)),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().map(float_count),
        _ => None,
    };
    number.unwrap_or(0)
}

fn float_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

/// What the retrieval backend made of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The backend answered with an `error` field.
    Rejected { message: String },

    /// The backend ingested the document, possibly partially.
    Ingested {
        filename: String,
        success: u64,
        fail: u64,
    },
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        // An empty, false, zero or null `error` counts as absent.
        let error_message = match response.error {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(message)) if message.is_empty() => None,
            Some(Value::Number(number)) if number.as_f64() == Some(0.0) => None,
            Some(Value::String(message)) => Some(message),
            Some(other) => Some(other.to_string()),
        };

        match error_message {
            Some(message) => UploadOutcome::Rejected { message },
            None => UploadOutcome::Ingested {
                filename: response.filename,
                success: response.success,
                fail: response.fail,
            },
        }
    }
}
