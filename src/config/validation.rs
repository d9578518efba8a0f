use crate::config::types::{
    ChannelConfig, ClientConfig, Config, CrawlerConfig, Credentials, OutputConfig, PortalConfig,
    RenderConfig, UserAgentConfig,
};
use crate::tree::License;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_credentials(&config.credentials)?;
    validate_channel_config(&config.channel)?;
    validate_crawler_config(&config.crawler)?;
    validate_client_config(&config.client)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the portal location
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use HTTP or HTTPS",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.login_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "login_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates login credentials
///
/// The identifier goes into the login form as typed, so any non-blank
/// value is accepted, including plain usernames.
fn validate_credentials(credentials: &Credentials) -> Result<(), ConfigError> {
    if credentials.email.trim().is_empty() {
        return Err(ConfigError::Validation(
            "email cannot be empty".to_string(),
        ));
    }

    if credentials.password.is_empty() {
        return Err(ConfigError::Validation(
            "password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates channel metadata
fn validate_channel_config(config: &ChannelConfig) -> Result<(), ConfigError> {
    for (field, value) in [
        ("channel name", &config.name),
        ("channel source_id", &config.source_id),
        ("channel source_domain", &config.source_domain),
        ("channel language", &config.language),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
        }
    }

    if config.license != License::PublicDomain && config.copyright_holder.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "copyright_holder is required for license '{}'",
            config.license
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.download_directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download_directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client tuning
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email("contact_email", &config.contact_email)?;

    Ok(())
}

/// Validates script rendering configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.load_js && config.command.is_empty() {
        return Err(ConfigError::Validation(
            "render.command is required when load_js is enabled".to_string(),
        ));
    }

    if config.command.first().is_some_and(|program| program.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "render.command program cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(field: &str, email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid {} format: '{}'",
            field, email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid {} format: '{}'",
            field, email
        )));
    }

    // Domain part should contain at least one dot
    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid {} domain: '{}'",
            field, email
        )));
    }

    Ok(())
}
