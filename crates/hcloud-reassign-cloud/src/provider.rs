//! Cloud API capability trait

use crate::action::Action;
use crate::error::Result;
use crate::metrics::{MetricsQuery, ServerMetrics};
use crate::resource::{FloatingIp, Network, PrimaryIp, ResourceId, Route, Server};
use async_trait::async_trait;

/// Capabilities the reassignment engine requires from a cloud provider
///
/// Lookups return `Ok(None)` when no resource carries the requested name;
/// `Err` is reserved for transport and API failures. Every mutating call
/// returns the [`Action`] the remote system created for it.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Base URL of the API this handle talks to
    fn endpoint(&self) -> &str;

    async fn find_server_by_name(&self, name: &str) -> Result<Option<Server>>;

    async fn get_server(&self, id: ResourceId) -> Result<Server>;

    async fn find_floating_ip_by_name(&self, name: &str) -> Result<Option<FloatingIp>>;

    /// Point a floating IP at a server
    async fn assign_floating_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action>;

    /// Re-fetch an action by its identifier
    async fn get_action(&self, id: ResourceId) -> Result<Action>;

    async fn find_primary_ip_by_name(&self, name: &str) -> Result<Option<PrimaryIp>>;

    /// Attach a primary IP to a (powered off) server
    async fn assign_primary_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action>;

    /// Detach a primary IP from its (powered off) server
    async fn unassign_primary_ip(&self, ip: ResourceId) -> Result<Action>;

    async fn power_off_server(&self, server: ResourceId) -> Result<Action>;

    async fn power_on_server(&self, server: ResourceId) -> Result<Action>;

    async fn find_network_by_name(&self, name: &str) -> Result<Option<Network>>;

    async fn add_route(&self, network: ResourceId, route: &Route) -> Result<Action>;

    async fn delete_route(&self, network: ResourceId, route: &Route) -> Result<Action>;

    async fn server_metrics(
        &self,
        server: ResourceId,
        query: &MetricsQuery,
    ) -> Result<ServerMetrics>;
}
