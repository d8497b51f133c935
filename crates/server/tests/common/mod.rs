#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use configs::AppConfig;
use server::{routes, ServerState};
use service::errors::ServiceError;
use service::installer::{CommandOutput, CommandRunner};
use service::registry::{InMemoryRegistryStore, RegistryStore};
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const HELM_OUTPUT: &str = "NAME:   wobbly-panda\nLAST DEPLOYED: Tue Oct  3 10:00:00 2017\nNAMESPACE: default\nSTATUS: DEPLOYED\n";

/// Canned helm: always exits 0 with `HELM_OUTPUT`, recording the args it saw.
#[derive(Default)]
pub struct FakeHelm {
    pub calls: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl CommandRunner for FakeHelm {
    async fn run(&self, _program: &str, args: &[String], _timeout: Option<Duration>) -> Result<CommandOutput, ServiceError> {
        self.calls.lock().await.push(args.to_vec());
        Ok(CommandOutput { success: true, code: Some(0), combined: HELM_OUTPUT.to_string() })
    }
}

/// Registry whose backend is unreachable.
pub struct DownStore;

#[async_trait]
impl RegistryStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, ServiceError> {
        Err(ServiceError::Store("connection refused".into()))
    }
    async fn set(&self, _key: &str, _value: String) -> Result<(), ServiceError> {
        Err(ServiceError::Store("connection refused".into()))
    }
    async fn keys(&self, _prefix: &str) -> Result<Vec<String>, ServiceError> {
        Err(ServiceError::Store("connection refused".into()))
    }
    async fn ping(&self) -> Result<(), ServiceError> {
        Err(ServiceError::Store("connection refused".into()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryRegistryStore>,
    pub helm: Arc<FakeHelm>,
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.helm.host = "tiller:44134".into();
    cfg.broker.last_operation_delay_ms = 20;
    cfg
}

pub fn build_app() -> TestApp {
    let store = InMemoryRegistryStore::new();
    let helm = Arc::new(FakeHelm::default());
    let state = ServerState::new(store.clone(), helm.clone(), &test_config());
    TestApp { router: routes::build_router(state), store, helm }
}

pub fn build_app_with_store(store: Arc<dyn RegistryStore>) -> Router {
    let state = ServerState::new(store, Arc::new(FakeHelm::default()), &test_config());
    routes::build_router(state)
}

pub async fn send(router: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, String)> {
    let resp: Response<Body> = router.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

pub fn register_request(name: &str, body: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(format!("/register-service/{}", name))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

/// `/v2` request carrying the broker API version header.
pub fn osb_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> anyhow::Result<Request<Body>> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Broker-API-Version", "2.13");
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(req)
}

/// `/v2` request with a raw body and an optional content type, for malformed inputs.
pub fn osb_raw_request(method: &str, uri: &str, content_type: Option<&str>, body: &str) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Broker-API-Version", "2.13");
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

/// `?operation=<token>` with the token form-encoded.
pub fn operation_query(token: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("operation", token)
        .finish()
}
