//! Wire types of the Hetzner Cloud API

use hcloud_reassign_cloud::{
    Action, CloudError, FloatingIp, Network, PrimaryIp, ResourceId, Server, ServerMetrics,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ServersResponse {
    pub servers: Vec<Server>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServerResponse {
    pub server: Server,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FloatingIpsResponse {
    pub floating_ips: Vec<FloatingIp>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrimaryIpsResponse {
    pub primary_ips: Vec<PrimaryIp>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NetworksResponse {
    pub networks: Vec<Network>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionResponse {
    pub action: Action,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetricsResponse {
    pub metrics: ServerMetrics,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignFloatingIpRequest {
    pub server: ResourceId,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignPrimaryIpRequest {
    pub assignee_id: ResourceId,
    pub assignee_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// Map a non-2xx response body to a [`CloudError`]
pub(crate) fn error_from_body(status: u16, body: &[u8]) -> CloudError {
    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse { error }) => match error.code.as_str() {
            "not_found" => CloudError::ResourceNotFound(error.message),
            "unauthorized" | "forbidden" => CloudError::AuthenticationFailed(error.message),
            _ => CloudError::api(error.code, error.message),
        },
        Err(_) => CloudError::api(
            status.to_string(),
            String::from_utf8_lossy(body).trim().to_string(),
        ),
    }
}
