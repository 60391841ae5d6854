//! Hetzner Cloud REST client
//!
//! Direct API implementation with Bearer token authentication.

use crate::api::{
    ActionResponse, AssignFloatingIpRequest, AssignPrimaryIpRequest, FloatingIpsResponse,
    MetricsResponse, NetworksResponse, PrimaryIpsResponse, ServerResponse, ServersResponse,
    error_from_body,
};
use async_trait::async_trait;
use hcloud_reassign_cloud::{
    Action, CloudApi, CloudError, FloatingIp, MetricsQuery, Network, PrimaryIp, ResourceId,
    Result, Route, Server, ServerMetrics,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an authenticated client handle for the given endpoint
pub fn make_client(token: impl Into<String>, url: impl Into<String>) -> Result<HetznerClient> {
    HetznerClient::new(token, url)
}

/// Hetzner Cloud API client
pub struct HetznerClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl std::fmt::Debug for HetznerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerClient")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl HetznerClient {
    pub fn new(token: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let api_token = token.into();
        if api_token.trim().is_empty() {
            return Err(CloudError::InvalidConfig("API token is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hcloud-reassign/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CloudError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_url: normalize_url(&url.into()),
            api_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!("GET {}{}", self.api_url, path);

        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .query(query)
            .send()
            .await
            .map_err(|e| CloudError::Http(e.to_string()))?;

        decode(response).await
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}{}", self.api_url, path);

        let mut request = self.client.post(self.url(path)).bearer_auth(&self.api_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CloudError::Http(e.to_string()))?;

        decode(response).await
    }

    async fn post_action<B>(&self, path: &str, body: Option<&B>) -> Result<Action>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response: ActionResponse = self.post(path, body).await?;
        tracing::debug!(
            action = response.action.id,
            command = %response.action.command,
            status = %response.action.status,
            "Action created"
        );
        Ok(response.action)
    }

    fn by_name(name: &str) -> [(&'static str, String); 1] {
        [("name", name.to_string())]
    }
}

/// Strip trailing slashes so paths can be appended verbatim
fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| CloudError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &body));
    }

    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl CloudApi for HetznerClient {
    fn endpoint(&self) -> &str {
        &self.api_url
    }

    async fn find_server_by_name(&self, name: &str) -> Result<Option<Server>> {
        let response: ServersResponse = self.get("/servers", &Self::by_name(name)).await?;
        Ok(response.servers.into_iter().next())
    }

    async fn get_server(&self, id: ResourceId) -> Result<Server> {
        let response: ServerResponse = self.get(&format!("/servers/{}", id), &[]).await?;
        Ok(response.server)
    }

    async fn find_floating_ip_by_name(&self, name: &str) -> Result<Option<FloatingIp>> {
        let response: FloatingIpsResponse =
            self.get("/floating_ips", &Self::by_name(name)).await?;
        Ok(response.floating_ips.into_iter().next())
    }

    async fn assign_floating_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action> {
        let body = AssignFloatingIpRequest { server };
        self.post_action(&format!("/floating_ips/{}/actions/assign", ip), Some(&body))
            .await
    }

    async fn get_action(&self, id: ResourceId) -> Result<Action> {
        let response: ActionResponse = self.get(&format!("/actions/{}", id), &[]).await?;
        Ok(response.action)
    }

    async fn find_primary_ip_by_name(&self, name: &str) -> Result<Option<PrimaryIp>> {
        let response: PrimaryIpsResponse = self.get("/primary_ips", &Self::by_name(name)).await?;
        Ok(response.primary_ips.into_iter().next())
    }

    async fn assign_primary_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action> {
        let body = AssignPrimaryIpRequest {
            assignee_id: server,
            assignee_type: "server",
        };
        self.post_action(&format!("/primary_ips/{}/actions/assign", ip), Some(&body))
            .await
    }

    async fn unassign_primary_ip(&self, ip: ResourceId) -> Result<Action> {
        self.post_action::<()>(&format!("/primary_ips/{}/actions/unassign", ip), None)
            .await
    }

    async fn power_off_server(&self, server: ResourceId) -> Result<Action> {
        self.post_action::<()>(&format!("/servers/{}/actions/poweroff", server), None)
            .await
    }

    async fn power_on_server(&self, server: ResourceId) -> Result<Action> {
        self.post_action::<()>(&format!("/servers/{}/actions/poweron", server), None)
            .await
    }

    async fn find_network_by_name(&self, name: &str) -> Result<Option<Network>> {
        let response: NetworksResponse = self.get("/networks", &Self::by_name(name)).await?;
        Ok(response.networks.into_iter().next())
    }

    async fn add_route(&self, network: ResourceId, route: &Route) -> Result<Action> {
        self.post_action(&format!("/networks/{}/actions/add_route", network), Some(route))
            .await
    }

    async fn delete_route(&self, network: ResourceId, route: &Route) -> Result<Action> {
        self.post_action(
            &format!("/networks/{}/actions/delete_route", network),
            Some(route),
        )
        .await
    }

    async fn server_metrics(
        &self,
        server: ResourceId,
        query: &MetricsQuery,
    ) -> Result<ServerMetrics> {
        let params = [
            ("type", query.type_param()),
            ("start", query.start.to_rfc3339()),
            ("end", query.end.to_rfc3339()),
            ("step", query.step.to_string()),
        ];
        let response: MetricsResponse = self
            .get(&format!("/servers/{}/metrics", server), &params)
            .await?;
        Ok(response.metrics)
    }
}
