//! Action polling with a bounded retry budget

use crate::model::StatusCode;
use async_trait::async_trait;
use hcloud_reassign_cloud::{Action, ActionStatus, CloudApi, CloudError};
use std::time::Duration;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between two status checks
///
/// Production code sleeps on the tokio timer; tests record the calls instead.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry policy of the poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of status fetches per action
    pub max_retries: u32,
    /// Fixed pause after a fetch that is still running
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Fire-and-forget: never fetch, report in-flight actions as running
    pub fn no_wait() -> Self {
        Self {
            max_retries: 0,
            interval: Duration::ZERO,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_INTERVAL)
    }
}

/// Drives an [`Action`] to a terminal state
#[derive(Clone, Copy)]
pub struct ActionPoller<'a> {
    api: &'a dyn CloudApi,
    sleeper: &'a dyn Sleeper,
    config: PollConfig,
}

impl<'a> ActionPoller<'a> {
    pub fn new(api: &'a dyn CloudApi, sleeper: &'a dyn Sleeper, config: PollConfig) -> Self {
        Self {
            api,
            sleeper,
            config,
        }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Poll until the action succeeds, fails or the retry budget is spent
    ///
    /// Returns `Timeout` when the action is still running after a non-zero
    /// budget, `Running` when the budget is zero. Fetch failures propagate.
    pub async fn poll(&self, action: Action) -> Result<StatusCode, CloudError> {
        let mut action = action;
        let mut retries = 0;

        while retries < self.config.max_retries && !action.is_terminal() {
            action = self.api.get_action(action.id).await?;
            retries += 1;

            tracing::debug!(
                action = action.id,
                command = %action.command,
                status = %action.status,
                progress = action.progress,
                attempt = retries,
                "Polled action"
            );

            if action.status == ActionStatus::Running {
                self.sleeper.sleep(self.config.interval).await;
            }
        }

        let status = match action.status {
            ActionStatus::Success => StatusCode::Success,
            ActionStatus::Error => {
                match &action.error {
                    Some(error) => tracing::error!(
                        action = action.id,
                        "Action '{}' failed: {} ({})",
                        action.command,
                        error.message,
                        error.code
                    ),
                    None => tracing::error!(action = action.id, "Action '{}' failed", action.command),
                }
                StatusCode::Error
            }
            ActionStatus::Running if self.config.max_retries > 0 => {
                tracing::warn!(
                    action = action.id,
                    "Action '{}' still running after {} checks",
                    action.command,
                    retries
                );
                StatusCode::Timeout
            }
            ActionStatus::Running => StatusCode::Running,
        };

        Ok(status)
    }
}
