pub mod list;
pub mod metrics;
pub mod reassign;

use hcloud_reassign_core::config::TOKEN_ENV;
use hcloud_reassign_core::{ReassignConfig, find_config_file, validate_client};
use hcloud_reassign_hetzner::{HetznerClient, make_client};
use std::path::Path;

/// Locate and read the configuration, applying the token override
///
/// A prompted token wins over `HCLOUD_TOKEN`, which wins over the file.
pub fn load_config(path: Option<&Path>, prompt_token: bool) -> anyhow::Result<ReassignConfig> {
    let path = find_config_file(path)?;
    tracing::info!("Using configuration {}", path.display());
    let mut config = ReassignConfig::load(&path)?;

    if prompt_token {
        let token = rpassword::prompt_password("Hetzner Cloud API token: ")?;
        config.set_token(token.trim());
    } else if let Ok(token) = std::env::var(TOKEN_ENV) {
        if !token.trim().is_empty() {
            tracing::debug!("Using API token from {}", TOKEN_ENV);
            config.set_token(token.trim());
        }
    }

    Ok(config)
}

/// Validate the client section and build the API handle
pub fn build_client(config: &mut ReassignConfig) -> anyhow::Result<HetznerClient> {
    let client = validate_client(&mut config.client)?;
    Ok(make_client(client.api_token, client.api_url)?)
}
