#![allow(dead_code)]

use async_trait::async_trait;
use hcloud_reassign_cloud::{
    Action, ActionError, ActionStatus, CloudApi, CloudError, FloatingIp, MetricsQuery, Network,
    PrimaryIp, ResourceId, Result, Route, Server, ServerMetrics, ServerStatus, TimeSeries,
};
use hcloud_reassign_core::{ReassignConfig, ResourceSection, ResourceSections, Sleeper};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct State {
    servers: Vec<Server>,
    floating_ips: Vec<FloatingIp>,
    primary_ips: Vec<PrimaryIp>,
    networks: Vec<Network>,
    metrics: HashMap<ResourceId, ServerMetrics>,

    next_action: ResourceId,
    /// Remaining statuses per action; the last one repeats
    scripts: HashMap<ResourceId, VecDeque<ActionStatus>>,
    /// Scripts for the next created actions, in order
    pending_scripts: VecDeque<Vec<ActionStatus>>,
    default_script: Vec<ActionStatus>,
    fail_action_fetch: bool,

    calls: Vec<String>,
    action_fetches: usize,
    metrics_queries: Vec<(ResourceId, String)>,
}

/// In-memory cloud with scripted action progress
pub struct FakeCloud {
    state: Mutex<State>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_action: 1000,
                default_script: vec![ActionStatus::Success],
                ..Default::default()
            }),
        }
    }

    pub fn with_server(self, server: Server) -> Self {
        self.state.lock().unwrap().servers.push(server);
        self
    }

    pub fn with_floating_ip(self, id: ResourceId, name: &str, server: Option<ResourceId>) -> Self {
        self.state.lock().unwrap().floating_ips.push(FloatingIp {
            id,
            name: name.to_string(),
            ip: "131.232.99.1".to_string(),
            server,
        });
        self
    }

    pub fn with_primary_ip(self, id: ResourceId, name: &str, assignee: Option<ResourceId>) -> Self {
        self.state.lock().unwrap().primary_ips.push(PrimaryIp {
            id,
            name: name.to_string(),
            ip: "131.232.99.2".to_string(),
            ip_type: "ipv4".to_string(),
            assignee_id: assignee,
        });
        self
    }

    pub fn with_network(self, id: ResourceId, name: &str, routes: Vec<Route>) -> Self {
        self.state.lock().unwrap().networks.push(Network {
            id,
            name: name.to_string(),
            ip_range: "10.0.0.0/16".to_string(),
            routes,
        });
        self
    }

    pub fn with_metrics(self, server: ResourceId, series: &[(&str, &[&str])]) -> Self {
        let time_series: BTreeMap<String, TimeSeries> = series
            .iter()
            .map(|(name, values)| {
                let values = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (1_714_564_800.0 + 60.0 * i as f64, v.to_string()))
                    .collect();
                (name.to_string(), TimeSeries { values })
            })
            .collect();

        let metrics = ServerMetrics {
            start: chrono::Utc::now(),
            end: chrono::Utc::now(),
            step: 60.0,
            time_series,
        };
        self.state.lock().unwrap().metrics.insert(server, metrics);
        self
    }

    /// Statuses returned by successive fetches of every action
    pub fn with_default_script(self, statuses: &[ActionStatus]) -> Self {
        self.state.lock().unwrap().default_script = statuses.to_vec();
        self
    }

    /// Statuses for the next action created; queued scripts apply in order
    pub fn script_next_action(&self, statuses: &[ActionStatus]) {
        self.state
            .lock()
            .unwrap()
            .pending_scripts
            .push_back(statuses.to_vec());
    }

    pub fn fail_action_fetch(&self) {
        self.state.lock().unwrap().fail_action_fetch = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn action_fetches(&self) -> usize {
        self.state.lock().unwrap().action_fetches
    }

    pub fn metrics_queries(&self) -> Vec<(ResourceId, String)> {
        self.state.lock().unwrap().metrics_queries.clone()
    }

    pub fn floating_ip_server(&self, name: &str) -> Option<ResourceId> {
        let state = self.state.lock().unwrap();
        state
            .floating_ips
            .iter()
            .find(|ip| ip.name == name)
            .and_then(|ip| ip.server)
    }

    pub fn primary_ip_assignee(&self, name: &str) -> Option<ResourceId> {
        let state = self.state.lock().unwrap();
        state
            .primary_ips
            .iter()
            .find(|ip| ip.name == name)
            .and_then(|ip| ip.assignee_id)
    }

    pub fn server_status(&self, name: &str) -> Option<ServerStatus> {
        let state = self.state.lock().unwrap();
        state
            .servers
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.status)
    }

    pub fn routes(&self, network: &str) -> Vec<Route> {
        let state = self.state.lock().unwrap();
        state
            .networks
            .iter()
            .find(|n| n.name == network)
            .map(|n| n.routes.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: String) -> Action {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        state.next_action += 1;
        let id = state.next_action;
        let script = state
            .pending_scripts
            .pop_front()
            .unwrap_or_else(|| state.default_script.clone());
        state.scripts.insert(id, script.into_iter().collect());

        Action::new(id, call, ActionStatus::Running)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }
}

#[async_trait]
impl CloudApi for FakeCloud {
    fn endpoint(&self) -> &str {
        "http://fake-cloud/v1"
    }

    async fn find_server_by_name(&self, name: &str) -> Result<Option<Server>> {
        Ok(self.with_state(|s| s.servers.iter().find(|x| x.name == name).cloned()))
    }

    async fn get_server(&self, id: ResourceId) -> Result<Server> {
        self.with_state(|s| s.servers.iter().find(|x| x.id == id).cloned())
            .ok_or_else(|| CloudError::ResourceNotFound(format!("server {}", id)))
    }

    async fn find_floating_ip_by_name(&self, name: &str) -> Result<Option<FloatingIp>> {
        Ok(self.with_state(|s| s.floating_ips.iter().find(|x| x.name == name).cloned()))
    }

    async fn assign_floating_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action> {
        self.with_state(|s| {
            if let Some(fip) = s.floating_ips.iter_mut().find(|x| x.id == ip) {
                fip.server = Some(server);
            }
        });
        Ok(self.record(format!("assign_floating_ip:{}:{}", ip, server)))
    }

    async fn get_action(&self, id: ResourceId) -> Result<Action> {
        let mut state = self.state.lock().unwrap();
        state.action_fetches += 1;
        if state.fail_action_fetch {
            return Err(CloudError::Http("connection reset".to_string()));
        }

        let script = state
            .scripts
            .get_mut(&id)
            .ok_or_else(|| CloudError::ResourceNotFound(format!("action {}", id)))?;
        let status = if script.len() > 1 {
            script.pop_front().unwrap_or(ActionStatus::Running)
        } else {
            script.front().copied().unwrap_or(ActionStatus::Running)
        };

        let mut action = Action::new(id, "scripted", status);
        if status == ActionStatus::Error {
            action.error = Some(ActionError {
                code: "action_failed".to_string(),
                message: "Action failed".to_string(),
            });
        }
        Ok(action)
    }

    async fn find_primary_ip_by_name(&self, name: &str) -> Result<Option<PrimaryIp>> {
        Ok(self.with_state(|s| s.primary_ips.iter().find(|x| x.name == name).cloned()))
    }

    async fn assign_primary_ip(&self, ip: ResourceId, server: ResourceId) -> Result<Action> {
        self.with_state(|s| {
            if let Some(pip) = s.primary_ips.iter_mut().find(|x| x.id == ip) {
                pip.assignee_id = Some(server);
            }
        });
        Ok(self.record(format!("assign_primary_ip:{}:{}", ip, server)))
    }

    async fn unassign_primary_ip(&self, ip: ResourceId) -> Result<Action> {
        self.with_state(|s| {
            if let Some(pip) = s.primary_ips.iter_mut().find(|x| x.id == ip) {
                pip.assignee_id = None;
            }
        });
        Ok(self.record(format!("unassign_primary_ip:{}", ip)))
    }

    async fn power_off_server(&self, server: ResourceId) -> Result<Action> {
        self.with_state(|s| {
            if let Some(srv) = s.servers.iter_mut().find(|x| x.id == server) {
                srv.status = ServerStatus::Off;
            }
        });
        Ok(self.record(format!("poweroff:{}", server)))
    }

    async fn power_on_server(&self, server: ResourceId) -> Result<Action> {
        self.with_state(|s| {
            if let Some(srv) = s.servers.iter_mut().find(|x| x.id == server) {
                srv.status = ServerStatus::Running;
            }
        });
        Ok(self.record(format!("poweron:{}", server)))
    }

    async fn find_network_by_name(&self, name: &str) -> Result<Option<Network>> {
        Ok(self.with_state(|s| s.networks.iter().find(|x| x.name == name).cloned()))
    }

    async fn add_route(&self, network: ResourceId, route: &Route) -> Result<Action> {
        self.with_state(|s| {
            if let Some(net) = s.networks.iter_mut().find(|x| x.id == network) {
                net.routes.push(route.clone());
            }
        });
        Ok(self.record(format!(
            "add_route:{}:{}:{}",
            network, route.destination, route.gateway
        )))
    }

    async fn delete_route(&self, network: ResourceId, route: &Route) -> Result<Action> {
        self.with_state(|s| {
            if let Some(net) = s.networks.iter_mut().find(|x| x.id == network) {
                net.routes.retain(|r| r != route);
            }
        });
        Ok(self.record(format!(
            "delete_route:{}:{}:{}",
            network, route.destination, route.gateway
        )))
    }

    async fn server_metrics(
        &self,
        server: ResourceId,
        query: &MetricsQuery,
    ) -> Result<ServerMetrics> {
        let mut state = self.state.lock().unwrap();
        state.metrics_queries.push((server, query.type_param()));
        state
            .metrics
            .get(&server)
            .cloned()
            .ok_or_else(|| CloudError::ResourceNotFound(format!("metrics of {}", server)))
    }
}

/// Sleeper that records requested pauses without waiting
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub fn floating_ip_section(resource: &str, source: &str, destination: &str) -> ResourceSection {
    ResourceSection::new()
        .with("type", "ip_floating")
        .with("resource", resource)
        .with("source", source)
        .with("destination", destination)
        .with("metrics", false)
}

pub fn primary_ip_section(resource: &str, source: &str, destination: &str) -> ResourceSection {
    ResourceSection::new()
        .with("type", "ip_public")
        .with("resource", resource)
        .with("source", source)
        .with("destination", destination)
}

pub fn route_section(network: &str, route: &str, source: &str, destination: &str) -> ResourceSection {
    ResourceSection::new()
        .with("type", "route")
        .with("resource", network)
        .with("route", route)
        .with("source", source)
        .with("destination", destination)
}

pub fn sections(entries: Vec<(&str, ResourceSection)>) -> ResourceSections {
    entries
        .into_iter()
        .map(|(name, section)| (name.to_string(), section))
        .collect()
}

pub fn parse_config(ini: &str) -> ReassignConfig {
    ReassignConfig::from_ini_str(ini).unwrap()
}
