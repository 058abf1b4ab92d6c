use serde::{Deserialize, Serialize};

/// Literal carried in the `test` field of every webhook body
pub const TEST_MARKER: &str = "event";

/// Body POSTed to the webhook for a flagged event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event_id: String,
    pub test: String,
}

impl WebhookPayload {
    pub fn for_event(event_id: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            test: TEST_MARKER.to_string(),
        }
    }
}

/// Webhook response body, decoded as JSON only when the server says it is JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

/// What happened to a notification.
///
/// Failures are values here, never errors: the flow logs them and moves on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    /// The webhook answered with a 2xx status
    Delivered { http_status: u16, body: ResponseBody },
    /// The webhook answered with a non-2xx status
    Rejected { http_status: u16, body: ResponseBody },
    /// No usable answer: transport error, timeout, undecodable body or a stopped actor
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        NotificationOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered { .. })
    }
}

/// Check a `Content-Type` header value for `application/json`
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}
