mod handlers;

use crate::error::Error;
use crate::flow::ClassifyCalendarEvent;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use handlers::{health_handler, list_flows_handler, run_flow_handler};

#[derive(Clone)]
pub struct AppState {
    /// The flow served by this process
    pub flow: Arc<ClassifyCalendarEvent>,
}

impl AppState {
    pub fn new(flow: ClassifyCalendarEvent) -> Self {
        Self {
            flow: Arc::new(flow),
        }
    }
}

/// Build the router exposing the flow
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/flows", get(list_flows_handler))
        .route("/flows/{name}/runs", post(run_flow_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl Error {
    /// Stable label used in error responses
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedInput(_) => "malformed_input",
            Error::Classification(_) => "classification_failure",
            Error::Environment(_) => "environment",
            Error::Config(_) => "config",
            Error::Component(_) => "component",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
            Error::Other(_) => "other",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Classification(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}
