//! Page fetcher
//!
//! Resolves portal links against the base origin, fetches them through the
//! authenticated client and parses the markup leniently.

use crate::client::{ensure_success, PortalClient};
use crate::ChefError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::Html;
use url::Url;

/// A parsed document and the URL it came from
pub struct Page {
    pub url: Url,
    pub document: Html,
}

/// Fetches and parses portal pages
#[derive(Debug, Clone)]
pub struct PageFetcher {
    base: Url,
    load_js: bool,
}

impl PageFetcher {
    /// Creates a fetcher for the portal at `base_url`
    ///
    /// With `load_js` set, pages are obtained through the client's script
    /// renderer instead of a plain GET.
    pub fn new(base_url: &str, load_js: bool) -> Result<Self, ChefError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, load_js })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Turns a possibly-relative link into an absolute URL
    ///
    /// Absolute `http`/`https` URLs pass through unchanged. Anything else is
    /// appended to the base URL with leading slashes removed, so a base of
    /// `https://host/app` maps `/portal` to `https://host/app/portal`.
    pub fn resolve(&self, url: &str) -> Result<Url, ChefError> {
        let url = url.trim();
        if let Ok(absolute) = Url::parse(url) {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                return Ok(absolute);
            }
        }
        Ok(self.base.join(url.trim_start_matches('/'))?)
    }

    /// Fetches and parses `url`
    pub async fn get_soup(&self, client: &PortalClient, url: &str) -> Result<Page, ChefError> {
        self.fetch(client, url, HeaderMap::new()).await
    }

    /// Fetches and parses an ajax fragment such as a resource detail pane
    ///
    /// The `X-Requested-With` header is only sent on plain fetches; a
    /// script renderer receives the URL and session cookies alone.
    pub async fn get_ajax_soup(&self, client: &PortalClient, url: &str) -> Result<Page, ChefError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        self.fetch(client, url, headers).await
    }

    async fn fetch(
        &self,
        client: &PortalClient,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Page, ChefError> {
        let resolved = self.resolve(url)?;
        tracing::debug!("Fetching {}", resolved);

        let body = if self.load_js {
            client.read(resolved.as_str(), true).await?
        } else {
            let response = ensure_success(client.get(resolved.as_str(), headers).await?)?;
            response.text().await.map_err(|source| ChefError::Http {
                url: resolved.to_string(),
                source,
            })?
        };

        Ok(Page {
            url: resolved,
            document: Html::parse_document(&body),
        })
    }
}
