//! hcloud-reassign Cloud API abstraction
//!
//! This crate defines the contract the reassignment engine needs from a
//! cloud provider: name lookups for servers and network resources, the
//! calls that move a resource between servers, and the asynchronous
//! action records those calls return.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                hcloud-reassign CLI               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │              hcloud-reassign-core                │
//! │   validator → handlers → poller → orchestrator   │
//! └─────────────────┬───────────────────────────────┘
//!                   │  &dyn CloudApi
//! ┌─────────────────▼───────────────────────────────┐
//! │             hcloud-reassign-cloud                │
//! │  trait CloudApi { ... }   Action / Server / ...  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │    hetzner    │
//!           │  HTTP client  │
//!           └───────────────┘
//! ```

pub mod action;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod resource;

/// Public Hetzner Cloud API endpoint
pub const DEFAULT_API_URL: &str = "https://api.hetzner.cloud/v1";

// Re-exports
pub use action::{Action, ActionError, ActionStatus};
pub use error::{CloudError, Result};
pub use metrics::{MetricKind, MetricsQuery, ServerMetrics, TimeSeries};
pub use provider::CloudApi;
pub use resource::{
    FloatingIp, Network, PrimaryIp, PrivateNet, ResourceId, Route, Server, ServerStatus,
};
