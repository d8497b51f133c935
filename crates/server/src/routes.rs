pub mod broker;
pub mod health;
pub mod register;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::metrics;
use crate::state::ServerState;

/// Build the full application router: registration, health, metrics and the
/// Open Service Broker `/v2` API.
pub fn build_router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/register-service/", post(register::register_unnamed))
        .route("/register-service/:name", post(register::register_service));

    // Broker API; every route checks X-Broker-API-Version first
    let osb = Router::new()
        .route("/v2/catalog", get(broker::catalog))
        .route(
            "/v2/service_instances/:instance_id",
            put(broker::provision)
                .patch(broker::update)
                .delete(broker::deprovision),
        )
        .route(
            "/v2/service_instances/:instance_id/last_operation",
            get(broker::last_operation),
        )
        .route(
            "/v2/service_instances/:instance_id/service_bindings/:binding_id",
            put(broker::bind).delete(broker::unbind),
        )
        .route_layer(middleware::from_fn(broker::require_api_version));

    public
        .merge(osb)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，日志级别为 INFO，不记录请求头
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应时记录状态码和耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
