use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use super::AppState;

/// Handler for health checks
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler listing the flows this process serves
pub async fn list_flows_handler(State(state): State<AppState>) -> impl IntoResponse {
    let flow = &state.flow;
    Json(json!([{
        "name": flow.name(),
        "policy": flow.policy_name(),
        "notifier": flow.has_notifier(),
    }]))
}

/// Handler running the flow with the request body as the serialized event
pub async fn run_flow_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: String,
) -> Response {
    if name != state.flow.name() {
        warn!("Run requested for unknown flow '{}'", name);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Unknown flow '{}'", name),
                "code": "unknown_flow",
            })),
        )
            .into_response();
    }

    match state.flow.run(&body).await {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(e) => e.into_response(),
    }
}
