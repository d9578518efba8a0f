use crate::ident::CollisionPolicy;
use crate::tree::License;
use serde::Deserialize;
use std::fmt;

/// Main configuration structure for Portal-Chef
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portal: PortalConfig,
    pub credentials: Credentials,
    pub channel: ChannelConfig,
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Location of the portal being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Base origin every relative link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the landing page listing the curriculum tabs
    #[serde(rename = "landing-path", default = "default_landing_path")]
    pub landing_path: String,

    /// Path of the page carrying the login form
    #[serde(rename = "login-path", default = "default_login_path")]
    pub login_path: String,
}

fn default_landing_path() -> String {
    "portal".to_string()
}

fn default_login_path() -> String {
    "portal/auth/login".to_string()
}

/// Account used to log into the portal
///
/// `PORTAL_CHEF_EMAIL` and `PORTAL_CHEF_PASSWORD` override the file values.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Channel metadata attached to the root node
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Display name of the channel
    pub name: String,

    /// Unique id of the channel
    #[serde(rename = "source-id")]
    pub source_id: String,

    /// Who is providing the content
    #[serde(rename = "source-domain")]
    pub source_domain: String,

    /// Language code of the channel
    pub language: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Local path or URL of the channel thumbnail
    #[serde(default)]
    pub thumbnail: Option<String>,

    /// License applied to every document
    pub license: License,

    /// Copyright holder applied to every document
    #[serde(rename = "copyright-holder")]
    pub copyright_holder: String,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Directory downloaded documents are cached in
    #[serde(rename = "download-directory")]
    pub download_directory: String,

    /// What to do when a tab or resource fails
    #[serde(rename = "branch-errors", default)]
    pub branch_errors: BranchErrorPolicy,

    /// What to do when two nodes normalize to the same identifier
    #[serde(rename = "id-collisions", default)]
    pub id_collisions: CollisionPolicy,
}

/// Handling of errors confined to one tab or resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchErrorPolicy {
    /// The first error aborts the whole crawl
    #[default]
    Abort,
    /// The failing branch is logged and left out of the tree
    Skip,
}

/// HTTP client tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overall per-request timeout; requests are unbounded when absent
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Script rendering for pages that only populate client-side
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Fetch every crawled page through the render command
    #[serde(rename = "load-js", default)]
    pub load_js: bool,

    /// Headless browser invocation; the page URL is appended as the last
    /// argument and the rendered DOM is read from stdout
    ///
    /// The session's `Cookie` header for the page is passed in the
    /// `PORTAL_CHEF_COOKIE` environment variable; the command must send it
    /// itself. Extra request headers such as `X-Requested-With` are not
    /// forwarded.
    #[serde(default)]
    pub command: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite run ledger
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown outline of the channel
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
