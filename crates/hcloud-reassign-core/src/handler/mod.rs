//! Resource handlers
//!
//! One handler per resource type. The [`HandlerRegistry`] maps the `type`
//! option of a section to the constructor of its handler; every constructor
//! validates the section before a handler exists.

mod floating_ip;
mod primary_ip;
mod route;

pub use floating_ip::FloatingIpHandler;
pub use primary_ip::PrimaryIpHandler;
pub use route::RouteHandler;

use crate::error::{ReassignError, Result, ValidationError};
use crate::model::{Direction, ResourceSection, ResourceType, StatusCode};
use crate::poller::ActionPoller;
use async_trait::async_trait;
use hcloud_reassign_cloud::{Action, CloudApi, CloudError};
use std::collections::HashMap;
use std::future::Future;

/// Shared collaborators of a handler
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub api: &'a dyn CloudApi,
    pub poller: ActionPoller<'a>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(api: &'a dyn CloudApi, poller: ActionPoller<'a>) -> Self {
        Self { api, poller }
    }

    /// Poll one step of a multi-step reassignment
    ///
    /// Returns the status that aborts the sequence, `None` on success.
    pub(crate) async fn step(&self, what: &str, action: Action) -> Result<Option<StatusCode>> {
        let status = self.poller.poll(action).await?;
        if status.is_success() {
            tracing::debug!("{}: done", what);
            Ok(None)
        } else {
            tracing::warn!("{}: {}", what, status);
            Ok(Some(status))
        }
    }
}

/// A resource that can be moved between its source and destination server
#[async_trait]
pub trait Reassign: Send + Sync {
    fn resource_type(&self) -> ResourceType;

    /// Name of the remote resource
    fn name(&self) -> &str;

    async fn reassign(&self, direction: Direction) -> Result<StatusCode>;

    /// Reassign using the textual direction (`src` or `dest`)
    async fn reassign_str(&self, direction: &str) -> Result<StatusCode> {
        let direction: Direction = direction.parse()?;
        self.reassign(direction).await
    }
}

/// Builds a validated handler from a section
pub type HandlerConstructor = for<'a> fn(
    &ResourceSection,
    HandlerContext<'a>,
) -> std::result::Result<Box<dyn Reassign + 'a>, ValidationError>;

/// Resource type to handler constructor table
#[derive(Clone)]
pub struct HandlerRegistry {
    constructors: HashMap<ResourceType, HandlerConstructor>,
}

impl HandlerRegistry {
    /// Registry without any handler
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registry with the floating IP, primary IP and route handlers
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(ResourceType::FloatingIp, floating_ip::construct);
        registry.register(ResourceType::PrimaryIp, primary_ip::construct);
        registry.register(ResourceType::Route, route::construct);
        registry
    }

    pub fn register(&mut self, ty: ResourceType, constructor: HandlerConstructor) {
        self.constructors.insert(ty, constructor);
    }

    /// Resolve the section's type and construct its handler
    pub fn build<'a>(
        &self,
        section: &ResourceSection,
        ctx: HandlerContext<'a>,
    ) -> Result<Box<dyn Reassign + 'a>> {
        let raw = section.section_type().ok_or(ValidationError::MissingType)?;
        let constructor = ResourceType::from_type(raw)
            .and_then(|ty| self.constructors.get(&ty))
            .ok_or_else(|| ReassignError::UnknownType(raw.to_string()))?;
        Ok(constructor(section, ctx)?)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Text option of a validated section
pub(crate) fn required_text(
    section: &ResourceSection,
    name: &str,
) -> std::result::Result<String, ValidationError> {
    section
        .text(name)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| ValidationError::MissingOption(name.to_string()))
}

/// Await a by-name lookup, folding "not found" into `None`
pub(crate) async fn lookup<T>(
    what: &str,
    name: &str,
    request: impl Future<Output = hcloud_reassign_cloud::Result<Option<T>>>,
) -> Result<Option<T>> {
    match request.await {
        Ok(Some(found)) => Ok(Some(found)),
        Ok(None) | Err(CloudError::ResourceNotFound(_)) => {
            tracing::warn!("{} '{}' not found", what, name);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
