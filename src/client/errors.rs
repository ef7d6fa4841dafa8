//! Structured error bodies returned by the API and the decode-or-fallback rendering used in
//! [`ClientError::Api`](super::ClientError::Api).

use reqwest::StatusCode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Exception details common to every error body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionInfo {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_stack: Option<Vec<String>>,
}

/// Body of a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response422 {
    #[serde(flatten)]
    pub exception: ExceptionInfo,
    #[serde(default)]
    pub validation_errors: Vec<ValidationErrorDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorDetail {
    #[serde(default)]
    pub property_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_value: Option<serde_json::Value>,
    #[serde(default)]
    pub message: String,
}

/// Body of a 404 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response404 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub exception: ExceptionInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause_exception_class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause_exception_stack: Option<Vec<String>>,
}

/// Body of a 500 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response500 {
    #[serde(flatten)]
    pub exception: ExceptionInfo,
}

/// Renders a non-2xx body for an error message.
///
/// 422, 404 and 500 bodies are decoded into their structured shape and re-encoded as compact
/// JSON. Any other status, or a body that fails to decode, is returned unchanged. This never fails.
pub fn describe_error_body(status: StatusCode, body: &str) -> String {
    let reencoded = match status {
        StatusCode::UNPROCESSABLE_ENTITY => reencode::<Response422>(body),
        StatusCode::NOT_FOUND => reencode::<Response404>(body),
        StatusCode::INTERNAL_SERVER_ERROR => reencode::<Response500>(body),
        _ => None,
    };
    reencoded.unwrap_or_else(|| body.to_string())
}

fn reencode<T>(body: &str) -> Option<String>
where
    T: DeserializeOwned + Serialize,
{
    let decoded: T = serde_json::from_str(body).ok()?;
    serde_json::to_string(&decoded).ok()
}
