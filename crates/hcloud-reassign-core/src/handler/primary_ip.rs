use super::{HandlerContext, Reassign, lookup, required_text};
use crate::error::{Result, ValidationError};
use crate::model::{Direction, ResourceSection, ResourceType, StatusCode};
use crate::validator::validate_section;
use async_trait::async_trait;
use hcloud_reassign_cloud::{PrimaryIp, Server};
use tracing::instrument;

/// Moves a primary IP between servers
///
/// Primary IPs can only be (un)assigned while the server is powered off, so
/// the move stops the current holder and the target, swaps the address and
/// starts both servers again:
///
/// ```text
/// holder: poweroff → unassign
/// target: poweroff → assign → poweron
/// holder: poweron (only if it was running)
/// ```
///
/// If a step fails after a server was powered off, the servers stopped so
/// far are powered on again and the IP stays where the sequence left it.
///
/// Hetzner allows one primary IP per address family on a server. The target
/// must not hold a primary IP of the same family, or the assign step fails.
pub struct PrimaryIpHandler<'a> {
    ctx: HandlerContext<'a>,
    resource: String,
    source: String,
    destination: String,
}

impl<'a> PrimaryIpHandler<'a> {
    pub fn new(
        section: &ResourceSection,
        ctx: HandlerContext<'a>,
    ) -> std::result::Result<Self, ValidationError> {
        let ty = ResourceType::PrimaryIp;
        validate_section(section, ty.as_str(), ty.schema())?;

        Ok(Self {
            ctx,
            resource: required_text(section, "resource")?,
            source: required_text(section, "source")?,
            destination: required_text(section, "destination")?,
        })
    }
}

pub(crate) fn construct<'a>(
    section: &ResourceSection,
    ctx: HandlerContext<'a>,
) -> std::result::Result<Box<dyn Reassign + 'a>, ValidationError> {
    Ok(Box::new(PrimaryIpHandler::new(section, ctx)?))
}

#[async_trait]
impl Reassign for PrimaryIpHandler<'_> {
    fn resource_type(&self) -> ResourceType {
        ResourceType::PrimaryIp
    }

    fn name(&self) -> &str {
        &self.resource
    }

    #[instrument(skip(self), fields(resource = %self.resource))]
    async fn reassign(&self, direction: Direction) -> Result<StatusCode> {
        let api = self.ctx.api;
        let target_name = direction.target(&self.source, &self.destination);

        let Some(target) =
            lookup("Server", target_name, api.find_server_by_name(target_name)).await?
        else {
            return Ok(StatusCode::Error);
        };
        let Some(ip) = lookup(
            "Primary IP",
            &self.resource,
            api.find_primary_ip_by_name(&self.resource),
        )
        .await?
        else {
            return Ok(StatusCode::Error);
        };

        if ip.assignee_id == Some(target.id) {
            tracing::info!(
                "Primary IP '{}' is already assigned to server '{}'",
                ip.name,
                target.name
            );
            return Ok(StatusCode::Success);
        }

        let holder = match ip.assignee_id {
            Some(id) => Some(api.get_server(id).await?),
            None => None,
        };

        let mut stopped = Vec::new();
        let outcome = self
            .swap(&ip, &target, holder.as_ref(), &mut stopped)
            .await;

        if !stopped.is_empty() && !matches!(outcome, Ok(StatusCode::Success)) {
            self.restart(&stopped).await;
        }
        outcome
    }
}

impl PrimaryIpHandler<'_> {
    /// Run the power and assignment steps
    ///
    /// `stopped` tracks the servers this run powered off and has not yet
    /// started again.
    async fn swap(
        &self,
        ip: &PrimaryIp,
        target: &Server,
        holder: Option<&Server>,
        stopped: &mut Vec<Server>,
    ) -> Result<StatusCode> {
        let api = self.ctx.api;
        let holder_was_running = holder.is_some_and(|h| h.is_running());

        if let Some(holder) = holder {
            if holder.is_running() {
                tracing::info!("Powering off current holder '{}'", holder.name);
                let action = api.power_off_server(holder.id).await?;
                if let Some(status) = self.ctx.step("power off holder", action).await? {
                    return Ok(status);
                }
                stopped.push(holder.clone());
            }

            tracing::info!("Unassigning primary IP '{}' from '{}'", ip.name, holder.name);
            let action = api.unassign_primary_ip(ip.id).await?;
            if let Some(status) = self.ctx.step("unassign", action).await? {
                return Ok(status);
            }
        }

        if target.is_running() {
            tracing::info!("Powering off target '{}'", target.name);
            let action = api.power_off_server(target.id).await?;
            if let Some(status) = self.ctx.step("power off target", action).await? {
                return Ok(status);
            }
            stopped.push(target.clone());
        }

        tracing::info!(
            "Assigning primary IP '{}' ({}) to server '{}'",
            ip.name,
            ip.ip,
            target.name
        );
        let action = api.assign_primary_ip(ip.id, target.id).await?;
        if let Some(status) = self.ctx.step("assign", action).await? {
            return Ok(status);
        }

        tracing::info!("Powering on target '{}'", target.name);
        let action = api.power_on_server(target.id).await?;
        if let Some(status) = self.ctx.step("power on target", action).await? {
            return Ok(status);
        }
        stopped.retain(|s| s.id != target.id);

        if let Some(holder) = holder.filter(|_| holder_was_running) {
            tracing::info!("Powering on former holder '{}'", holder.name);
            let action = api.power_on_server(holder.id).await?;
            if let Some(status) = self.ctx.step("power on holder", action).await? {
                return Ok(status);
            }
            stopped.retain(|s| s.id != holder.id);
        }

        Ok(StatusCode::Success)
    }

    /// Best-effort power on after an aborted move
    async fn restart(&self, servers: &[Server]) {
        for server in servers {
            tracing::warn!("Move aborted, powering on '{}' again", server.name);
            let action = match self.ctx.api.power_on_server(server.id).await {
                Ok(action) => action,
                Err(e) => {
                    tracing::error!("Failed to power on '{}': {}", server.name, e);
                    continue;
                }
            };
            match self.ctx.poller.poll(action).await {
                Ok(StatusCode::Success) => {}
                Ok(status) => tracing::error!("Power on '{}': {}", server.name, status),
                Err(e) => tracing::error!("Failed to power on '{}': {}", server.name, e),
            }
        }
    }
}
