//! Configuration module for Portal-Chef
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use portal_chef::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("chef.toml")).unwrap();
//! println!("Crawling {}", config.portal.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BranchErrorPolicy, ChannelConfig, ClientConfig, Config, CrawlerConfig, Credentials,
    OutputConfig, PortalConfig, RenderConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    apply_credential_overrides, compute_config_hash, load_config, load_config_with_hash,
    EMAIL_ENV, PASSWORD_ENV,
};
pub use validation::validate;
