//! Script rendering through an external headless browser
//!
//! Some portal pages only populate after client-side script runs. For those,
//! a configured command (for example `chromium --headless --dump-dom`) is run
//! with the page URL as its last argument and its stdout is taken as the
//! rendered document. The session cookies travel in [`COOKIE_ENV`] so the
//! command can render pages behind the login.

use crate::config::RenderConfig;
use crate::ChefError;
use tokio::process::Command;

/// Environment variable holding the session's `Cookie` header
pub const COOKIE_ENV: &str = "PORTAL_CHEF_COOKIE";

/// Runs the configured render command for a URL
#[derive(Debug, Clone)]
pub struct Renderer {
    program: String,
    args: Vec<String>,
}

impl Renderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a renderer from configuration, if a command is configured
    pub fn from_config(config: &RenderConfig) -> Option<Self> {
        let (program, args) = config.command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// Renders `url` and returns the resulting markup
    ///
    /// `cookie` is the session's `Cookie` header for `url`, if it has one.
    pub async fn render(&self, url: &str, cookie: Option<&str>) -> Result<String, ChefError> {
        tracing::debug!("Rendering {} with {}", url, self.program);

        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(url).kill_on_drop(true);
        match cookie {
            Some(cookie) => command.env(COOKIE_ENV, cookie),
            None => command.env_remove(COOKIE_ENV),
        };

        let output = command
            .output()
            .await
            .map_err(|e| ChefError::Render {
                url: url.to_string(),
                message: format!("failed to start {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(ChefError::Render {
                url: url.to_string(),
                message: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
