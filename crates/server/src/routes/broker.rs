use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use service::broker::{BindDetails, Catalog, DeprovisionDetails, LastOperation, ProvisionDetails, UnbindDetails, UpdateDetails};

use crate::errors::{precondition_failed, BrokerError};
use crate::metrics::{self, LAST_OPERATIONS_TOTAL};
use crate::state::ServerState;

pub const API_VERSION_HEADER: &str = "X-Broker-API-Version";

/// Middleware: `/v2` requests must announce a 2.x broker API version.
pub async fn require_api_version(req: Request, next: Next) -> Response {
    let version = req
        .headers()
        .get(API_VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string());

    match version {
        None => precondition_failed("X-Broker-API-Version header not set"),
        Some(v) if !is_supported_version(&v) => {
            precondition_failed(&format!("X-Broker-API-Version {} is not supported, expected 2.x", v))
        }
        Some(_) => next.run(req).await,
    }
}

fn is_supported_version(value: &str) -> bool {
    value.split('.').next().and_then(|major| major.parse::<u32>().ok()) == Some(2)
}

#[derive(Deserialize, Debug, Default)]
pub struct AsyncQuery {
    #[serde(default)]
    pub accepts_incomplete: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct LastOperationQuery {
    #[serde(default)]
    pub operation: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DeprovisionQuery {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub accepts_incomplete: bool,
}

/// `GET /v2/catalog`
pub async fn catalog(State(state): State<ServerState>) -> Result<Json<Catalog>, BrokerError> {
    let services = state.broker.services().await?;
    Ok(Json(Catalog { services }))
}

/// `PUT /v2/service_instances/:instance_id`; holds the request open for the whole install.
pub async fn provision(
    State(state): State<ServerState>,
    Path(instance_id): Path<String>,
    query: Result<Query<AsyncQuery>, QueryRejection>,
    details: Result<Json<ProvisionDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), BrokerError> {
    let Query(query) = query?;
    let Json(details) = details?;
    let started = Instant::now();
    let result = state
        .broker
        .provision(&instance_id, details, query.accepts_incomplete)
        .await;
    metrics::record_provision(result.is_ok(), started.elapsed().as_secs_f64());

    let spec = result?;
    let mut body = json!({});
    if let Some(url) = spec.dashboard_url {
        body["dashboard_url"] = json!(url);
    }
    if spec.is_async {
        body["operation"] = json!(spec.operation_data);
        Ok((StatusCode::ACCEPTED, Json(body)))
    } else {
        Ok((StatusCode::CREATED, Json(body)))
    }
}

/// `GET /v2/service_instances/:instance_id/last_operation`
pub async fn last_operation(
    State(state): State<ServerState>,
    Path(instance_id): Path<String>,
    query: Result<Query<LastOperationQuery>, QueryRejection>,
) -> Result<Json<LastOperation>, BrokerError> {
    let Query(query) = query?;
    let operation = query.operation.unwrap_or_default();
    let last = state.broker.last_operation(&instance_id, &operation).await?;
    LAST_OPERATIONS_TOTAL.inc();
    Ok(Json(last))
}

/// `DELETE /v2/service_instances/:instance_id`
pub async fn deprovision(
    State(state): State<ServerState>,
    Path(instance_id): Path<String>,
    query: Result<Query<DeprovisionQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<Value>), BrokerError> {
    let Query(query) = query?;
    let details = DeprovisionDetails { service_id: query.service_id, plan_id: query.plan_id };
    let spec = state
        .broker
        .deprovision(&instance_id, details, query.accepts_incomplete)
        .await?;
    Ok(async_response(spec.is_async, spec.operation_data))
}

/// `PATCH /v2/service_instances/:instance_id`
pub async fn update(
    State(state): State<ServerState>,
    Path(instance_id): Path<String>,
    query: Result<Query<AsyncQuery>, QueryRejection>,
    details: Result<Json<UpdateDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), BrokerError> {
    let Query(query) = query?;
    let details = details_or_default(details);
    let spec = state
        .broker
        .update(&instance_id, details, query.accepts_incomplete)
        .await?;
    Ok(async_response(spec.is_async, spec.operation_data))
}

/// `PUT /v2/service_instances/:instance_id/service_bindings/:binding_id`
pub async fn bind(
    State(state): State<ServerState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    details: Result<Json<BindDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), BrokerError> {
    let details = details_or_default(details);
    let binding = state.broker.bind(&instance_id, &binding_id, details).await?;
    Ok((StatusCode::CREATED, Json(json!({"credentials": binding.credentials}))))
}

/// `DELETE /v2/service_instances/:instance_id/service_bindings/:binding_id`
pub async fn unbind(
    State(state): State<ServerState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    query: Result<Query<DeprovisionQuery>, QueryRejection>,
) -> Result<Json<Value>, BrokerError> {
    let Query(query) = query?;
    let details = UnbindDetails { service_id: query.service_id, plan_id: query.plan_id };
    state.broker.unbind(&instance_id, &binding_id, details).await?;
    Ok(Json(json!({})))
}

/// Update and bind are not supported, so an unreadable body must not hide the 501.
fn details_or_default<T: Default>(details: Result<Json<T>, JsonRejection>) -> T {
    match details {
        Ok(Json(details)) => details,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "ignoring unreadable body");
            T::default()
        }
    }
}

fn async_response(is_async: bool, operation_data: String) -> (StatusCode, Json<Value>) {
    if is_async {
        (StatusCode::ACCEPTED, Json(json!({"operation": operation_data})))
    } else {
        (StatusCode::OK, Json(json!({})))
    }
}
