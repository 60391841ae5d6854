//! hcloud-reassign core
//!
//! Configuration model and reassignment engine:
//!
//! - [`config`]: INI loading and config file discovery
//! - [`validator`]: section and client checks, run before any API call
//! - [`handler`]: floating IP, primary IP and route handlers
//! - [`poller`]: bounded polling of remote actions
//! - [`orchestrator`]: runs the requested sections and aggregates statuses
//! - [`metrics`]: server metrics report for a section

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod poller;
pub mod validator;

// Re-exports
pub use crate::config::{ReassignConfig, find_config_file};
pub use error::{ConfigError, MetricsError, ReassignError, Result, ValidationError};
pub use handler::{HandlerContext, HandlerRegistry, Reassign};
pub use model::*;
pub use orchestrator::{Orchestrator, ResourceResult, RunReport};
pub use poller::{ActionPoller, PollConfig, Sleeper, TokioSleeper};
pub use validator::{validate_client, validate_section};
