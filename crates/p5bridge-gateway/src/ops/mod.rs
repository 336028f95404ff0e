//! Operational HTTP endpoints.
//!
//! - `/status`  : running flag + live editor count (after a heartbeat sweep)
//! - `/healthz` : liveness

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub status: &'static str,
    pub connected_clients: usize,
    pub message: &'static str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn status(State(state): State<AppState>) -> Json<StatusBody> {
    state.monitor().sweep();
    Json(StatusBody {
        status: "running",
        connected_clients: state.registry().count(),
        message: "p5.js bridge relay",
    })
}
