//! Configuration file loading
//!
//! The configuration is an INI file with one `client` section holding the API
//! settings and any number of resource sections:
//!
//! ```ini
//! [client]
//! api_url = https://api.hetzner.cloud/v1
//! api_token = ...
//!
//! [web-ip]
//! type = ip_floating
//! resource = web-ip
//! source = srv-a
//! destination = srv-b
//! metrics = false
//! ```

use crate::error::ConfigError;
use crate::model::{
    CLIENT_SECTION, ClientSection, DEFAULT_API_URL, OPTION_API_TOKEN, OPTION_API_URL, OptionKind,
    OptionValue, ResourceSection, ResourceSections, ResourceType,
};
use config::{FileFormat, Format, Value};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "HCLOUD_REASSIGN_CONFIG";

/// Environment variable overriding the API token
pub const TOKEN_ENV: &str = "HCLOUD_TOKEN";

const LOCAL_CONFIG_FILE: &str = "hcloud-reassign.ini";
const GLOBAL_CONFIG_DIR: &str = "hcloud-reassign";
const GLOBAL_CONFIG_FILE: &str = "config.ini";

/// Client settings plus resource sections, as read from one file
#[derive(Debug, Clone, Default)]
pub struct ReassignConfig {
    pub client: ClientSection,
    pub sections: ResourceSections,
}

impl ReassignConfig {
    /// Read and parse a configuration file
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_ini_str(&content)
    }

    /// Parse configuration from INI text
    ///
    /// Section names are kept verbatim, so `[1.2.3.4]` stays one section.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigError> {
        let raw = FileFormat::Ini
            .parse(None, content)
            .map_err(config::ConfigError::Foreign)?;

        let mut client = None;
        let mut sections = ResourceSections::new();

        for (name, value) in raw {
            let options = match section_options(value) {
                Some(options) => options,
                None => {
                    tracing::warn!("Ignoring option '{}' outside of any section", name);
                    continue;
                }
            };

            if name == CLIENT_SECTION {
                client = Some(options.into_iter().collect::<ClientSection>());
            } else {
                sections.insert(name, resource_section(options));
            }
        }

        let client = client.unwrap_or_else(|| {
            tracing::warn!(
                "Section '{}' is not defined, using default {}",
                CLIENT_SECTION,
                DEFAULT_API_URL
            );
            let mut client = ClientSection::new();
            client.insert(OPTION_API_URL.to_string(), DEFAULT_API_URL.to_string());
            client
        });

        Ok(Self { client, sections })
    }

    /// Replace the API token of the client section
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.client
            .insert(OPTION_API_TOKEN.to_string(), token.into());
    }

    /// Override source and destination servers of the named sections
    ///
    /// An empty `names` slice applies the override to every section. Names
    /// that are not configured are left for the orchestrator to report.
    pub fn override_servers(
        &mut self,
        names: &[String],
        source: Option<&str>,
        destination: Option<&str>,
    ) {
        if source.is_none() && destination.is_none() {
            return;
        }

        let targets = if names.is_empty() {
            self.sections.names()
        } else {
            names.to_vec()
        };

        for name in targets {
            let Some(section) = self.sections.get_mut(&name) else {
                continue;
            };
            if let Some(source) = source {
                tracing::info!("Overriding source of '{}' with '{}'", name, source);
                section.insert("source", source);
            }
            if let Some(destination) = destination {
                tracing::info!("Overriding destination of '{}' with '{}'", name, destination);
                section.insert("destination", destination);
            }
        }
    }
}

/// Flatten one INI section into string options
fn section_options(value: Value) -> Option<Vec<(String, String)>> {
    let table = value.into_table().ok()?;
    let mut options: Vec<(String, String)> = table
        .into_iter()
        .filter_map(|(key, value)| value.into_string().ok().map(|v| (key, v)))
        .collect();
    options.sort();
    Some(options)
}

/// Build a resource section, converting options the schema declares boolean
fn resource_section(options: Vec<(String, String)>) -> ResourceSection {
    let ty = options
        .iter()
        .find(|(key, _)| key == "type")
        .and_then(|(_, value)| ResourceType::from_type(value));

    let mut section = ResourceSection::new();
    for (key, raw) in options {
        let value = match ty.and_then(|ty| ty.option_kind(&key)) {
            Some(OptionKind::Flag) => parse_ini_bool(&raw)
                .map(OptionValue::Flag)
                .unwrap_or(OptionValue::Text(raw)),
            _ => OptionValue::Text(raw),
        };
        section.insert(key, value);
    }
    section
}

/// INI boolean words, case-insensitive
pub fn parse_ini_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Locate the configuration file
///
/// Search order:
/// 1. the explicit path (`--config`)
/// 2. the `HCLOUD_REASSIGN_CONFIG` environment variable
/// 3. `./hcloud-reassign.ini`
/// 4. `<config dir>/hcloud-reassign/config.ini`
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::Missing(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points to missing file {}", CONFIG_ENV, path.display());
    }

    let local = std::env::current_dir()?.join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Ok(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE);
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
