use super::{HandlerContext, Reassign, lookup, required_text};
use crate::error::{Result, ValidationError};
use crate::model::{Direction, ResourceSection, ResourceType, StatusCode};
use crate::validator::validate_section;
use async_trait::async_trait;
use tracing::instrument;

/// Moves a floating IP by pointing it at the target server
pub struct FloatingIpHandler<'a> {
    ctx: HandlerContext<'a>,
    resource: String,
    source: String,
    destination: String,
}

impl<'a> FloatingIpHandler<'a> {
    pub fn new(
        section: &ResourceSection,
        ctx: HandlerContext<'a>,
    ) -> std::result::Result<Self, ValidationError> {
        let ty = ResourceType::FloatingIp;
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
    Ok(Box::new(FloatingIpHandler::new(section, ctx)?))
}

#[async_trait]
impl Reassign for FloatingIpHandler<'_> {
    fn resource_type(&self) -> ResourceType {
        ResourceType::FloatingIp
    }

    fn name(&self) -> &str {
        &self.resource
    }

    #[instrument(skip(self), fields(resource = %self.resource))]
    async fn reassign(&self, direction: Direction) -> Result<StatusCode> {
        let api = self.ctx.api;
        let target = direction.target(&self.source, &self.destination);

        let Some(server) = lookup("Server", target, api.find_server_by_name(target)).await? else {
            return Ok(StatusCode::Error);
        };
        let Some(ip) = lookup(
            "Floating IP",
            &self.resource,
            api.find_floating_ip_by_name(&self.resource),
        )
        .await?
        else {
            return Ok(StatusCode::Error);
        };

        tracing::info!(
            "Assigning floating IP '{}' ({}) to server '{}'",
            ip.name,
            ip.ip,
            server.name
        );
        let action = api.assign_floating_ip(ip.id, server.id).await?;
        Ok(self.ctx.poller.poll(action).await?)
    }
}
