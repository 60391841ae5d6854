//! Asynchronous action records returned by mutating API calls

use crate::resource::ResourceId;
use serde::{Deserialize, Serialize};

/// An in-flight or completed operation on the remote system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Identifier used to re-fetch the action
    pub id: ResourceId,

    /// Remote command name (e.g. "assign_floating_ip")
    #[serde(default)]
    pub command: String,

    /// Current status
    pub status: ActionStatus,

    /// Progress in percent
    #[serde(default)]
    pub progress: u8,

    /// Error details if the action failed
    #[serde(default)]
    pub error: Option<ActionError>,
}

impl Action {
    pub fn new(id: ResourceId, command: impl Into<String>, status: ActionStatus) -> Self {
        Self {
            id,
            command: command.into(),
            status,
            progress: if status == ActionStatus::Success { 100 } else { 0 },
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Native status vocabulary of the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Running,
    Success,
    Error,
}

impl ActionStatus {
    /// Whether the remote system will not change this status anymore
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionStatus::Success | ActionStatus::Error)
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Running => write!(f, "running"),
            ActionStatus::Success => write!(f, "success"),
            ActionStatus::Error => write!(f, "error"),
        }
    }
}

/// Error reported by the remote system for a failed action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionError {
    pub code: String,
    pub message: String,
}
