mod common;

use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let app = common::build_app();
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.router).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_register_provision_poll() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/healthz", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{}/register-service/redis", app.base_url))
        .json(&json!({"helm_chart_name": "stable/redis"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.text().await?, "added redis: stable/redis");

    let res = c
        .put(format!("{}/v2/service_instances/i-1", app.base_url))
        .query(&[("accepts_incomplete", "true")])
        .header("X-Broker-API-Version", "2.13")
        .json(&json!({"service_id": "redis", "plan_id": "plan-redis", "organization_guid": "o", "space_guid": "s"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::ACCEPTED);
    let body = res.json::<serde_json::Value>().await?;
    let operation = body["operation"].as_str().expect("operation").to_string();

    let res = c
        .get(format!("{}/v2/service_instances/i-1/last_operation", app.base_url))
        .query(&[("operation", operation.as_str())])
        .header("X-Broker-API-Version", "2.13")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["state"], "succeeded");
    Ok(())
}
