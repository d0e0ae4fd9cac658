//! HTTP client for the remote transcription/summarization service.
//!
//! Every operation posts a form (multipart for the upload path,
//! urlencoded for the rest), reads the body as text, and speculatively
//! parses it as JSON. Non-2xx responses become errors carrying the HTTP
//! status and body; nothing is retried and no timeout is applied.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::language::Language;

/// Errors produced by the API client.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, body read) or a malformed
    /// request part.
    Request {
        op: &'static str,
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    Status {
        op: &'static str,
        status: u16,
        body: String,
    },
    /// A 2xx response without the expected `data` payload.
    MissingData { op: &'static str },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request { op, source } => write!(f, "{} failed: {}", op, source),
            ApiError::Status { op, status, body } => {
                write!(f, "{} failed: HTTP {} - {}", op, status, body)
            }
            ApiError::MissingData { op } => write!(f, "{} returned no data", op),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Processing progress reported by the service for one task.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskProgress {
    #[serde(default)]
    pub task_status: Option<i64>,
    #[serde(default)]
    pub desc: Option<String>,
}

impl TaskProgress {
    pub fn describe(&self) -> String {
        if let Some(desc) = self.desc.as_deref().filter(|d| !d.is_empty()) {
            return desc.to_string();
        }
        match self.task_status {
            Some(2) => "Processing audio...".to_string(),
            Some(status) => format!("Status: {}", status),
            None => "Status unknown".to_string(),
        }
    }
}

/// Client for one service instance. Holds a shared connection pool.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register an upcoming upload and obtain its task id.
    pub async fn prepare_task(
        &self,
        file_name: &str,
        file_len: u64,
        total_segments: u32,
    ) -> Result<String, ApiError> {
        const OP: &str = "prepare";

        debug!(file_name, file_len, total_segments, "prepare_task");

        let form = Form::new()
            .text("file_len", file_len.to_string())
            .text("file_name", file_name.to_string())
            .text("total_segments", total_segments.to_string());

        let response = self
            .http
            .post(self.url("/api/prepare"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let (status, body) = status_and_body(response).await;
        ensure_success(OP, status, &body)?;

        parse_lenient(&body)
            .as_ref()
            .and_then(|v| v.get("data"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ApiError::MissingData { op: OP })
    }

    /// Upload one audio segment as a binary file part.
    pub async fn upload_segment(
        &self,
        task_id: &str,
        segment_id: u32,
        segment_len: u64,
        content: Vec<u8>,
        file_name: &str,
    ) -> Result<Value, ApiError> {
        const OP: &str = "upload";

        debug!(task_id, segment_id, segment_len, file_name, "upload_segment");

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let form = Form::new()
            .text("task_id", task_id.to_string())
            .text("segment_id", segment_id.to_string())
            .text("segment_len", segment_len.to_string())
            .part("content", part);

        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let (status, body) = status_and_body(response).await;
        ensure_success(OP, status, &body)?;

        Ok(parse_lenient(&body).unwrap_or(Value::Null))
    }

    /// Fetch the raw transcript payload for a task, or None when the
    /// service has nothing yet. The caller normalizes the shape.
    pub async fn get_result(&self, task_id: &str) -> Result<Option<Value>, ApiError> {
        const OP: &str = "getResult";

        debug!(task_id, "get_result");

        let response = self
            .http
            .post(self.url("/api/getResult"))
            .form(&[("task_id", task_id)])
            .send()
            .await
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let (status, body) = status_and_body(response).await;
        ensure_success(OP, status, &body)?;

        Ok(data_field(parse_lenient(&body)))
    }

    /// Request a meeting summary. Unsupported languages were already
    /// folded to English by [`Language::parse`].
    pub async fn summarize_from_task(
        &self,
        task_id: &str,
        language: Language,
    ) -> Result<Option<Value>, ApiError> {
        const OP: &str = "summarize";

        debug!(task_id, language = language.as_tag(), "summarize_from_task");

        let response = self
            .http
            .post(self.url("/v1/api/summarize"))
            .form(&[("task_id", task_id), ("language", language.as_tag())])
            .send()
            .await
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let (status, body) = status_and_body(response).await;
        ensure_success(OP, status, &body)?;

        Ok(data_field(parse_lenient(&body)))
    }

    /// Poll processing progress for a task.
    pub async fn get_progress(&self, task_id: &str) -> Result<Option<TaskProgress>, ApiError> {
        const OP: &str = "getProgress";

        debug!(task_id, "get_progress");

        let response = self
            .http
            .post(self.url("/api/getProgress"))
            .form(&[("task_id", task_id)])
            .send()
            .await
            .map_err(|e| ApiError::Request { op: OP, source: e })?;

        let (status, body) = status_and_body(response).await;
        ensure_success(OP, status, &body)?;

        // Unparseable progress payloads count as absence, not failure.
        Ok(data_field(parse_lenient(&body))
            .and_then(|v| serde_json::from_value::<TaskProgress>(v).ok()))
    }
}

/// Read the response body as text; a failed body read degrades to an
/// empty string, matching how the UI treated unreadable bodies.
async fn status_and_body(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

fn ensure_success(op: &'static str, status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::Status {
            op,
            status,
            body: body.to_string(),
        })
    }
}

/// Speculative JSON parse; non-JSON bodies yield None.
fn parse_lenient(body: &str) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Extract the `data` envelope field, treating JSON null as absence.
fn data_field(value: Option<Value>) -> Option<Value> {
    value
        .and_then(|v| v.get("data").cloned())
        .filter(|v| !v.is_null())
}
