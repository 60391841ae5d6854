use super::{HandlerContext, Reassign, lookup, required_text};
use crate::error::{Result, ValidationError};
use crate::model::{Direction, ResourceSection, ResourceType, StatusCode};
use crate::validator::validate_section;
use async_trait::async_trait;
use hcloud_reassign_cloud::Route;
use tracing::instrument;

/// Points a network route at the target server's private address
///
/// The route is recreated: the existing route for the destination prefix
/// is deleted before the new one is added.
pub struct RouteHandler<'a> {
    ctx: HandlerContext<'a>,
    /// Network name
    resource: String,
    /// Destination prefix
    route: String,
    source: String,
    destination: String,
}

impl<'a> RouteHandler<'a> {
    pub fn new(
        section: &ResourceSection,
        ctx: HandlerContext<'a>,
    ) -> std::result::Result<Self, ValidationError> {
        let ty = ResourceType::Route;
        validate_section(section, ty.as_str(), ty.schema())?;

        Ok(Self {
            ctx,
            resource: required_text(section, "resource")?,
            route: required_text(section, "route")?,
            source: required_text(section, "source")?,
            destination: required_text(section, "destination")?,
        })
    }
}

pub(crate) fn construct<'a>(
    section: &ResourceSection,
    ctx: HandlerContext<'a>,
) -> std::result::Result<Box<dyn Reassign + 'a>, ValidationError> {
    Ok(Box::new(RouteHandler::new(section, ctx)?))
}

#[async_trait]
impl Reassign for RouteHandler<'_> {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Route
    }

    fn name(&self) -> &str {
        &self.resource
    }

    #[instrument(skip(self), fields(network = %self.resource, route = %self.route))]
    async fn reassign(&self, direction: Direction) -> Result<StatusCode> {
        let api = self.ctx.api;
        let target = direction.target(&self.source, &self.destination);

        let Some(network) = lookup(
            "Network",
            &self.resource,
            api.find_network_by_name(&self.resource),
        )
        .await?
        else {
            return Ok(StatusCode::Error);
        };
        let Some(server) = lookup("Server", target, api.find_server_by_name(target)).await? else {
            return Ok(StatusCode::Error);
        };

        let Some(gateway) = server.private_ip_in(network.id) else {
            tracing::warn!(
                "Server '{}' has no address in network '{}'",
                server.name,
                network.name
            );
            return Ok(StatusCode::Error);
        };
        let new_route = Route::new(self.route.as_str(), gateway);

        if let Some(existing) = network.route_for(&self.route) {
            if existing.gateway == new_route.gateway {
                tracing::info!(
                    "Route {} already points at {} ('{}')",
                    self.route,
                    gateway,
                    server.name
                );
                return Ok(StatusCode::Success);
            }

            tracing::info!("Deleting route {} via {}", existing.destination, existing.gateway);
            let action = api.delete_route(network.id, existing).await?;
            if let Some(status) = self.ctx.step("delete route", action).await? {
                return Ok(status);
            }
        }

        tracing::info!(
            "Adding route {} via {} ('{}')",
            new_route.destination,
            new_route.gateway,
            server.name
        );
        let action = api.add_route(network.id, &new_route).await?;
        Ok(self.ctx.poller.poll(action).await?)
    }
}
