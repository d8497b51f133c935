use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::{error, warn};

/// Plain-text failure for the registration endpoint. Every failure there is a 500,
/// validation included, and the body is the bare message plus a newline.
#[derive(Debug)]
pub struct PlainTextError(pub String);

impl From<ServiceError> for PlainTextError {
    fn from(e: ServiceError) -> Self {
        Self(e.message())
    }
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "registration request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", self.0)).into_response()
    }
}

/// Open Service Broker error body: `{"error": <code>, "description": <message>}`.
#[derive(Debug)]
pub struct BrokerError(pub ServiceError);

impl From<ServiceError> for BrokerError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

// 请求体或查询参数无法解析时，统一返回 OSB 格式的 400
impl From<JsonRejection> for BrokerError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for BrokerError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ServiceError::Validation(rejection.body_text()))
    }
}

impl BrokerError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::AsyncRequired => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match &self.0 {
            ServiceError::AsyncRequired => Some("AsyncRequired"),
            ServiceError::Unsupported(_) => Some("NotImplemented"),
            _ => None,
        }
    }

    fn description(&self) -> String {
        match &self.0 {
            ServiceError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for BrokerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let description = self.description();
        if status.is_server_error() {
            error!(%status, error = %description, "broker operation failed");
        } else {
            warn!(%status, error = %description, "broker request rejected");
        }
        let body = match self.code() {
            Some(code) => serde_json::json!({"error": code, "description": description}),
            None => serde_json::json!({"description": description}),
        };
        (status, Json(body)).into_response()
    }
}

/// Rejection for `/v2` requests without a usable `X-Broker-API-Version` header.
pub fn precondition_failed(description: &str) -> Response {
    warn!(%description, "broker api version check failed");
    (
        StatusCode::PRECONDITION_FAILED,
        Json(serde_json::json!({"description": description})),
    )
        .into_response()
}
