use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable overriding `credentials.email`
pub const EMAIL_ENV: &str = "PORTAL_CHEF_EMAIL";

/// Environment variable overriding `credentials.password`
pub const PASSWORD_ENV: &str = "PORTAL_CHEF_PASSWORD";

/// Loads and parses a configuration file from the given path
///
/// Credentials found in the environment replace the ones in the file
/// before validation runs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    apply_credential_overrides(&mut config, |name| std::env::var(name).ok());

    validate(&config)?;

    Ok(config)
}

/// Replaces configured credentials with values from `lookup`
///
/// `lookup` is queried with [`EMAIL_ENV`] and [`PASSWORD_ENV`]; empty values
/// are ignored.
pub fn apply_credential_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(email) = lookup(EMAIL_ENV).filter(|v| !v.is_empty()) {
        tracing::debug!("Using login email from {}", EMAIL_ENV);
        config.credentials.email = email;
    }
    if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
        tracing::debug!("Using login password from {}", PASSWORD_ENV);
        config.credentials.password = password;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is stored with every run in the ledger so runs made with
/// different settings can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
