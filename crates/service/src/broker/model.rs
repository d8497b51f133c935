//! Open Service Broker request and response bodies.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Catalog {
    pub services: Vec<Service>,
}

/// A catalog entry advertised to the platform.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub plan_updateable: bool,
    pub plans: Vec<ServicePlan>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServicePlan {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ProvisionDetails {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub space_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedServiceSpec {
    pub is_async: bool,
    pub dashboard_url: Option<String>,
    pub operation_data: String,
}

/// Deployment state is never tracked, so a polled operation only ever reports success.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOperationState {
    #[serde(rename = "succeeded")]
    Succeeded,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LastOperation {
    pub state: LastOperationState,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DeprovisionDetails {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprovisionServiceSpec {
    pub is_async: bool,
    pub operation_data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BindDetails {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Binding {
    pub credentials: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UnbindDetails {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateDetails {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateServiceSpec {
    pub is_async: bool,
    pub operation_data: String,
}
