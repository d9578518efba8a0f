//! Portal-Chef: an authenticated curriculum crawler
//!
//! This crate logs into an educational-content portal, walks its curriculum
//! hierarchy (tabs, column groups, definition-list sections, resources),
//! downloads every resource document behind the authenticated session and
//! assembles the result into a validated tree of channel content nodes.

pub mod client;
pub mod config;
pub mod crawler;
pub mod ident;
pub mod output;
pub mod storage;
pub mod tree;

use thiserror::Error;

/// Main error type for Portal-Chef operations
#[derive(Debug, Error)]
pub enum ChefError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Login form '{form_id}' not found at {url}")]
    LoginFormMissing { url: String, form_id: String },

    #[error("Login form field '{field}' not found at {url}")]
    LoginFieldMissing { url: String, field: String },

    #[error("Expected markup '{selector}' not found in {context}")]
    MissingMarkup { selector: String, context: String },

    #[error("No identifier found on {url}")]
    NoIdentifier { url: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Download of {url} could not be committed to {path}: {message}")]
    Download {
        url: String,
        path: String,
        message: String,
    },

    #[error("{url} would be stored at {path}, already taken by {claimed_by}")]
    DestinationConflict {
        path: String,
        url: String,
        claimed_by: String,
    },

    #[error("Invalid value for header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Tree error: {0}")]
    Tree(#[from] tree::TreeError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChefError {
    /// Returns true if the error belongs to a single crawl branch
    ///
    /// Page fetches, missing markup, render and download failures, and
    /// download destination conflicts only affect the tab or resource being
    /// processed. Authentication,
    /// configuration, ledger and tree validation errors are never
    /// recoverable.
    pub fn is_branch_local(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::HttpStatus { .. }
                | Self::MissingMarkup { .. }
                | Self::NoIdentifier { .. }
                | Self::Download { .. }
                | Self::DestinationConflict { .. }
                | Self::Render { .. }
                | Self::UrlParse(_)
                | Self::Reqwest(_)
                | Self::Io(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Portal-Chef operations
pub type Result<T> = std::result::Result<T, ChefError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::PortalClient;
pub use config::Config;
pub use crawler::Crawler;
pub use ident::normalize;
pub use tree::{ChannelNode, DocumentNode, Node, TopicNode};
