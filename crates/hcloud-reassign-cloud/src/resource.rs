//! Remote resources the reassignment engine looks up by name

use serde::{Deserialize, Serialize};

/// Numeric identifier assigned by the remote system
pub type ResourceId = u64;

/// A cloud server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: ResourceId,

    pub name: String,

    #[serde(default)]
    pub status: ServerStatus,

    /// Attachments to private networks
    #[serde(default)]
    pub private_net: Vec<PrivateNet>,
}

impl Server {
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ServerStatus::Running,
            private_net: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: ServerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_private_ip(mut self, network: ResourceId, ip: impl Into<String>) -> Self {
        self.private_net.push(PrivateNet {
            network,
            ip: ip.into(),
        });
        self
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.status == ServerStatus::Running
    }

    /// Private address of this server inside the given network
    pub fn private_ip_in(&self, network: ResourceId) -> Option<&str> {
        self.private_net
            .iter()
            .find(|n| n.network == network)
            .map(|n| n.ip.as_str())
    }
}

/// Power state of a server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    Running,
    Initializing,
    Starting,
    Stopping,
    Off,
    Deleting,
    Migrating,
    Rebuilding,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServerStatus::Running => "running",
            ServerStatus::Initializing => "initializing",
            ServerStatus::Starting => "starting",
            ServerStatus::Stopping => "stopping",
            ServerStatus::Off => "off",
            ServerStatus::Deleting => "deleting",
            ServerStatus::Migrating => "migrating",
            ServerStatus::Rebuilding => "rebuilding",
            ServerStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Server attachment to a private network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateNet {
    pub network: ResourceId,
    pub ip: String,
}

/// A floating IP address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: ResourceId,

    pub name: String,

    #[serde(default)]
    pub ip: String,

    /// Server the address currently points at
    #[serde(default)]
    pub server: Option<ResourceId>,
}

/// A primary IP address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryIp {
    pub id: ResourceId,

    pub name: String,

    #[serde(default)]
    pub ip: String,

    /// "ipv4" or "ipv6"
    #[serde(rename = "type", default)]
    pub ip_type: String,

    /// Server the address is attached to
    #[serde(default)]
    pub assignee_id: Option<ResourceId>,
}

/// A private network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: ResourceId,

    pub name: String,

    #[serde(default)]
    pub ip_range: String,

    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Network {
    /// Route configured for the given destination prefix
    pub fn route_for(&self, destination: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.destination == destination)
    }
}

/// A static route inside a private network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination prefix in CIDR notation
    pub destination: String,

    /// Next hop, a private address inside the network
    pub gateway: String,
}

impl Route {
    pub fn new(destination: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            gateway: gateway.into(),
        }
    }
}
