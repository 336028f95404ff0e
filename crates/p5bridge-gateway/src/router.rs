//! Axum router wiring.
//!
//! `/ws` upgrades editor sessions; `/status` and `/healthz` are read-only.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(transport::ws::ws_upgrade))
        .route("/status", get(ops::status))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
