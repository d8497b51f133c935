use axum::{extract::State, http::StatusCode};
use tracing::error;

use crate::state::ServerState;

/// Liveness: ping the registry store.
///
/// A failed ping still answers with the `OK` body, only the status turns
/// into 500. Monitors must look at the status code.
pub async fn healthz(State(state): State<ServerState>) -> (StatusCode, &'static str) {
    match state.registry.store().ping().await {
        Ok(()) => (StatusCode::OK, "OK\n"),
        Err(e) => {
            error!(error = %e, event = "registry_ping_failed", "registry ping failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "OK\n")
        }
    }
}
