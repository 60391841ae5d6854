use crate::model::OptionKind;
use hcloud_reassign_cloud::CloudError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while checking a section or the client configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Section 'type' is not defined or empty")]
    MissingType,

    #[error("Wrong section type: configured '{configured}', expected '{expected}'")]
    TypeMismatch { configured: String, expected: String },

    #[error("Option '{0}' is not defined or empty")]
    MissingOption(String),

    #[error("Option '{name}' is not of type '{expected}'")]
    WrongOptionType { name: String, expected: OptionKind },

    #[error("Option 'api_token' is not defined or empty. An API token is required for authentication")]
    MissingCredential,
}

/// Errors that abort the reassignment of a single resource
#[derive(Error, Debug)]
pub enum ReassignError {
    #[error("Invalid section: {0}")]
    Validation(#[from] ValidationError),

    #[error("Resource '{0}' is not a configured section")]
    UnknownResource(String),

    #[error("Unknown section type '{0}' (expected ip_floating, ip_public or route)")]
    UnknownType(String),

    #[error("Invalid direction '{0}' (expected 'src' or 'dest')")]
    InvalidDirection(String),

    #[error("Cloud API error: {0}")]
    Cloud(#[from] CloudError),
}

/// Errors raised while locating or reading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked for:\n\
        - the HCLOUD_REASSIGN_CONFIG environment variable\n\
        - ./hcloud-reassign.ini\n\
        - <config dir>/hcloud-reassign/config.ini\n\
        Pass --config <path> to use another file"
    )]
    ConfigFileNotFound,

    #[error("Configuration file does not exist: {0}")]
    Missing(PathBuf),

    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors of the metrics report
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Interval limits must be RFC 3339 timestamps: {0}")]
    InvalidTimestamp(String),

    #[error("Interval of {seconds}s is too short (minimum {minimum}s)")]
    IntervalTooShort { seconds: i64, minimum: i64 },

    #[error("Server '{0}' not found")]
    ServerNotFound(String),

    #[error("Invalid section: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cloud API error: {0}")]
    Cloud(#[from] CloudError),
}

pub type Result<T> = std::result::Result<T, ReassignError>;
