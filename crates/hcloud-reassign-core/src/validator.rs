//! Section validation
//!
//! Checks a resource section against the schema of its type and fills in
//! defaults for the client section.

use crate::error::ValidationError;
use crate::model::{
    ClientConfig, ClientSection, DEFAULT_API_URL, OPTION_API_TOKEN, OPTION_API_URL, ResourceSection,
    SchemaField,
};

/// Check that `section` is of type `expected` and defines every schema field
/// with the declared kind.
///
/// Fields are checked in schema order; the first failure is returned.
pub fn validate_section(
    section: &ResourceSection,
    expected: &str,
    schema: &[SchemaField],
) -> Result<(), ValidationError> {
    let configured = section.section_type().ok_or(ValidationError::MissingType)?;
    if configured != expected {
        return Err(ValidationError::TypeMismatch {
            configured: configured.to_string(),
            expected: expected.to_string(),
        });
    }

    for (name, kind) in schema {
        let value = section
            .get(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ValidationError::MissingOption(name.to_string()))?;

        if value.kind() != *kind {
            return Err(ValidationError::WrongOptionType {
                name: name.to_string(),
                expected: *kind,
            });
        }
    }

    Ok(())
}

/// Validate the client section, writing the default endpoint back when it is
/// unset.
pub fn validate_client(client: &mut ClientSection) -> Result<ClientConfig, ValidationError> {
    let url_unset = client
        .get(OPTION_API_URL)
        .is_none_or(|url| url.trim().is_empty());
    if url_unset {
        tracing::warn!(
            "Option '{}' is not defined or empty, using default {}",
            OPTION_API_URL,
            DEFAULT_API_URL
        );
        client.insert(OPTION_API_URL.to_string(), DEFAULT_API_URL.to_string());
    }

    let api_token = client
        .get(OPTION_API_TOKEN)
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or(ValidationError::MissingCredential)?
        .to_string();

    let api_url = client
        .get(OPTION_API_URL)
        .map(|url| url.trim().to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    Ok(ClientConfig { api_url, api_token })
}
