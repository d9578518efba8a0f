//! Authenticated portal session
//!
//! This module owns the cookie-bearing HTTP session used for every request
//! of a crawl, including:
//! - Building the HTTP client with a proper user agent string
//! - Form-based login
//! - GET requests with extra headers
//! - POST requests with CSRF token propagation
//! - Reading pages from disk, the network or a script renderer

use crate::client::form::{FormMethod, LoginForm, LOGIN_FORM_ID};
use crate::client::render::Renderer;
use crate::config::{ClientConfig, Config, Credentials, UserAgentConfig};
use crate::ChefError;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, Response};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Cookie the portal issues its anti-forgery token in
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the token is echoed in on POST (`X-CSRFToken`)
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Form field the token is echoed in on POST
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `CrawlerName/Version (+ContactURL; ContactEmail)`
/// and every response cookie lands in `jar`.
///
/// # Example
///
/// ```no_run
/// use portal_chef::client::build_http_client;
/// use portal_chef::config::{ClientConfig, UserAgentConfig};
/// use reqwest::cookie::Jar;
/// use std::sync::Arc;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "PortalChef".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &ClientConfig::default(), Arc::new(Jar::default())).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    settings: &ClientConfig,
    jar: Arc<Jar>,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    let mut builder = Client::builder()
        .user_agent(user_agent)
        .cookie_provider(jar)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .gzip(true)
        .brotli(true);

    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Turns a non-2xx response into a page-fetch error
pub fn ensure_success(response: Response) -> Result<Response, ChefError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ChefError::HttpStatus {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}

/// Cookie-bearing client for one portal account
///
/// All requests share one cookie jar. The client is meant for sequential
/// use: a `post` first fetches its referer for a fresh CSRF token and then submits,
/// and interleaving two of those could hand one request the other's token.
pub struct PortalClient {
    http: Client,
    jar: Arc<Jar>,
    credentials: Credentials,
    renderer: Option<Renderer>,
}

impl PortalClient {
    /// Creates a client for `credentials` without a script renderer
    pub fn new(
        credentials: Credentials,
        user_agent: &UserAgentConfig,
        settings: &ClientConfig,
    ) -> Result<Self, ChefError> {
        let jar = Arc::new(Jar::default());
        let http = build_http_client(user_agent, settings, jar.clone())?;

        Ok(Self {
            http,
            jar,
            credentials,
            renderer: None,
        })
    }

    /// Creates a client from a full configuration, renderer included
    pub fn from_config(config: &Config) -> Result<Self, ChefError> {
        let client = Self::new(config.credentials.clone(), &config.user_agent, &config.client)?;
        Ok(match Renderer::from_config(&config.render) {
            Some(renderer) => client.with_renderer(renderer),
            None => client,
        })
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Number of cookies the session would send to `url`
    pub fn cookie_count(&self, url: &Url) -> usize {
        self.jar
            .cookies(url)
            .and_then(|header| header.to_str().map(|s| s.split("; ").count()).ok())
            .unwrap_or(0)
    }

    /// Logs in through the portal's login form
    ///
    /// Fetches `login_url`, finds `form#form-login`, fills the email and
    /// password fields and submits the form with all its other controls
    /// (hidden CSRF fields included). Nothing else is requested if the form
    /// or one of its fields is missing.
    ///
    /// Success is not verified: a rejected login shows up later as failed
    /// or empty page fetches.
    pub async fn login(&self, login_url: &str) -> Result<(), ChefError> {
        tracing::info!("Logging in at {}", login_url);

        let response = ensure_success(self.get(login_url, HeaderMap::new()).await?)?;
        let page_url = response.url().clone();
        let body = response.text().await.map_err(|source| ChefError::Http {
            url: login_url.to_string(),
            source,
        })?;

        let mut form = LoginForm::parse(&body, LOGIN_FORM_ID, &page_url).ok_or_else(|| {
            ChefError::LoginFormMissing {
                url: page_url.to_string(),
                form_id: LOGIN_FORM_ID.to_string(),
            }
        })?;

        form.fill(&self.credentials)
            .map_err(|field| ChefError::LoginFieldMissing {
                url: page_url.to_string(),
                field: field.to_string(),
            })?;

        let request = match form.method {
            FormMethod::Post => self.http.post(form.action.clone()).form(&form.fields),
            FormMethod::Get => self.http.get(form.action.clone()).query(&form.fields),
        };

        let response = request
            .header(REFERER, page_url.as_str())
            .send()
            .await
            .map_err(|source| ChefError::Http {
                url: form.action.to_string(),
                source,
            })?;

        tracing::debug!(
            "Login form submitted to {} (HTTP {}), session holds {} cookies",
            form.action,
            response.status().as_u16(),
            self.cookie_count(&page_url)
        );

        Ok(())
    }

    /// Issues an authenticated GET and returns the raw response
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response, ChefError> {
        tracing::trace!("GET {}", url);

        self.http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|source| ChefError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Issues an authenticated form POST with CSRF propagation
    ///
    /// `referer` (defaulting to `url`) is fetched first to harvest a fresh
    /// `csrftoken` cookie. When that response sets one, it is sent as the
    /// `X-CSRFToken` header and, if `include_token` is true, as the
    /// `csrfmiddlewaretoken` body field. Otherwise neither is sent.
    pub async fn post(
        &self,
        url: &str,
        mut payload: Vec<(String, String)>,
        referer: Option<&str>,
        include_token: bool,
    ) -> Result<Response, ChefError> {
        let referer = referer.unwrap_or(url);

        let referer_page = self.get(referer, HeaderMap::new()).await?;
        let token = referer_page
            .cookies()
            .find(|cookie| cookie.name() == CSRF_COOKIE)
            .map(|cookie| cookie.value().to_string());

        let mut headers = HeaderMap::new();
        headers.insert(REFERER, header_value(REFERER.as_str(), referer)?);

        if let Some(token) = token {
            tracing::trace!("Propagating CSRF token from {}", referer);
            headers.insert(CSRF_HEADER, header_value(CSRF_HEADER, &token)?);
            if include_token {
                payload.retain(|(name, _)| name != CSRF_FIELD);
                payload.push((CSRF_FIELD.to_string(), token));
            }
        }

        tracing::trace!("POST {}", url);

        self.http
            .post(url)
            .headers(headers)
            .form(&payload)
            .send()
            .await
            .map_err(|source| ChefError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Reads a page from disk, the network, or the script renderer
    ///
    /// Local paths and `file://` URLs are read from disk. Otherwise the page
    /// is fetched with the session, or rendered by the configured command
    /// when `load_js` is true.
    pub async fn read(&self, path: &str, load_js: bool) -> Result<String, ChefError> {
        if let Some(local) = local_path(path) {
            tracing::trace!("Reading {}", local.display());
            return Ok(tokio::fs::read_to_string(local).await?);
        }

        if load_js {
            let renderer = self.renderer.as_ref().ok_or_else(|| ChefError::Render {
                url: path.to_string(),
                message: "no render command configured".to_string(),
            })?;
            let cookie = Url::parse(path)
                .ok()
                .and_then(|url| self.jar.cookies(&url))
                .and_then(|header| header.to_str().ok().map(str::to_string));
            return renderer.render(path, cookie.as_deref()).await;
        }

        let response = ensure_success(self.get(path, HeaderMap::new()).await?)?;
        response.text().await.map_err(|source| ChefError::Http {
            url: path.to_string(),
            source,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ChefError> {
    HeaderValue::from_str(value).map_err(|e| ChefError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Returns the filesystem path for `file://` URLs and plain paths
fn local_path(path: &str) -> Option<PathBuf> {
    match Url::parse(path) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Ok(_) => None,
        Err(_) => Some(PathBuf::from(path)),
    }
}
