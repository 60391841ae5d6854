use std::collections::BTreeMap;

/// Name of the section holding the API settings
pub const CLIENT_SECTION: &str = "client";

pub const OPTION_API_URL: &str = "api_url";
pub const OPTION_API_TOKEN: &str = "api_token";

/// Endpoint used when the client section does not name one
pub use hcloud_reassign_cloud::DEFAULT_API_URL;

/// Raw options of the `client` section
pub type ClientSection = BTreeMap<String, String>;

/// Validated API settings
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
