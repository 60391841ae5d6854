//! Reassignment orchestration
//!
//! Processes the requested resource sections one after the other and
//! collects a status per resource. Failures stay local to their resource.

use crate::error::ReassignError;
use crate::handler::{HandlerContext, HandlerRegistry};
use crate::model::{Direction, ResourceSections, StatusCode};
use crate::poller::{ActionPoller, PollConfig, Sleeper};
use hcloud_reassign_cloud::CloudApi;
use std::collections::BTreeMap;
use tracing::instrument;

/// Outcome of one resource
#[derive(Debug)]
pub struct ResourceResult {
    pub name: String,
    pub outcome: Result<StatusCode, ReassignError>,
}

impl ResourceResult {
    /// Status code; errors count as `Error`
    pub fn status(&self) -> StatusCode {
        match &self.outcome {
            Ok(status) => *status,
            Err(_) => StatusCode::Error,
        }
    }

    pub fn error(&self) -> Option<&ReassignError> {
        self.outcome.as_ref().err()
    }
}

/// Results of a run, in processing order
#[derive(Debug, Default)]
pub struct RunReport {
    results: Vec<ResourceResult>,
}

impl RunReport {
    pub fn push(&mut self, name: impl Into<String>, outcome: Result<StatusCode, ReassignError>) {
        self.results.push(ResourceResult {
            name: name.into(),
            outcome,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn status_of(&self, name: &str) -> Option<StatusCode> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(ResourceResult::status)
    }

    pub fn statuses(&self) -> BTreeMap<String, StatusCode> {
        self.results
            .iter()
            .map(|r| (r.name.clone(), r.status()))
            .collect()
    }

    /// Worst status of the run; `Success` when nothing was processed
    pub fn exit_status(&self) -> StatusCode {
        self.results
            .iter()
            .map(ResourceResult::status)
            .fold(StatusCode::Success, StatusCode::worst)
    }
}

/// Runs reassignments against one cloud API handle
pub struct Orchestrator<'a> {
    sections: &'a ResourceSections,
    api: &'a dyn CloudApi,
    sleeper: &'a dyn Sleeper,
    poll: PollConfig,
    registry: HandlerRegistry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        sections: &'a ResourceSections,
        api: &'a dyn CloudApi,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            sections,
            api,
            sleeper,
            poll: PollConfig::default(),
            registry: HandlerRegistry::builtin(),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Reassign the named resources, or every section when `names` is empty
    #[instrument(skip(self), fields(endpoint = %self.api.endpoint()))]
    pub async fn run(&self, names: &[String], direction: Direction) -> RunReport {
        let names = if names.is_empty() {
            self.sections.names()
        } else {
            names.to_vec()
        };

        let mut report = RunReport::default();
        for name in names {
            let outcome = self.reassign_one(&name, direction).await;
            match &outcome {
                Ok(status) => tracing::info!("{}: {}", name, status),
                Err(e) => tracing::warn!("{}: {}", name, e),
            }
            report.push(name, outcome);
        }
        report
    }

    /// Reassign with a textual direction (`src` or `dest`)
    pub async fn run_str(
        &self,
        names: &[String],
        direction: &str,
    ) -> Result<RunReport, ReassignError> {
        let direction: Direction = direction.parse()?;
        Ok(self.run(names, direction).await)
    }

    async fn reassign_one(
        &self,
        name: &str,
        direction: Direction,
    ) -> Result<StatusCode, ReassignError> {
        let section = self
            .sections
            .get(name)
            .ok_or_else(|| ReassignError::UnknownResource(name.to_string()))?;

        let poller = ActionPoller::new(self.api, self.sleeper, self.poll);
        let ctx = HandlerContext::new(self.api, poller);
        let handler = self.registry.build(section, ctx)?;

        tracing::debug!(
            "Reassigning {} '{}' to {}",
            handler.resource_type(),
            handler.name(),
            direction
        );
        handler.reassign(direction).await
    }
}
