use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::errors::PlainTextError;
use crate::metrics::REGISTRATIONS_TOTAL;
use crate::state::ServerState;

/// Body of `POST /register-service/{name}`. A `name` field, if sent, is ignored
/// in favour of the path segment.
#[derive(Deserialize, Debug, Default)]
pub struct RegisterServiceRequest {
    #[serde(default)]
    pub helm_chart_name: String,
}

pub async fn register_service(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, String), PlainTextError> {
    register(&state, &name, body).await
}

/// `POST /register-service/` — same handler with an empty name, which always fails.
pub async fn register_unnamed(
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, String), PlainTextError> {
    register(&state, "", body).await
}

async fn register(
    state: &ServerState,
    name: &str,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, String), PlainTextError> {
    if name.is_empty() {
        return Err(PlainTextError("name is empty".into()));
    }
    let body = body.map_err(|e| PlainTextError(e.body_text()))?;
    let request: RegisterServiceRequest =
        serde_json::from_slice(&body).map_err(|e| PlainTextError(e.to_string()))?;

    let registration = state.registry.register(name, &request.helm_chart_name).await?;
    REGISTRATIONS_TOTAL.inc();
    Ok((
        StatusCode::CREATED,
        format!("added {}: {}", registration.name, registration.helm_chart_name),
    ))
}
