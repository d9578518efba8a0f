//! Crawler coordinator - curriculum tree construction
//!
//! This module contains the crawl that builds the channel tree, including:
//! - Logging in
//! - Walking tabs, column groups, sections and resources in document order
//! - Downloading each resource document through the cache
//! - Applying the branch error and identifier collision policies
//! - Recording the run in the ledger

use crate::client::PortalClient;
use crate::config::{BranchErrorPolicy, Config};
use crate::crawler::download::{DownloadCache, DownloadOutcome};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{self, ResourceLink, Section, Tab};
use crate::ident::{normalize, IdRegistry};
use crate::storage::{AssetRecord, SqliteStorage, Storage};
use crate::tree::{validate_channel, ChannelNode, DocumentFile, DocumentNode, TopicNode};
use crate::ChefError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main crawler structure
///
/// Owns the authenticated client for the whole crawl. Requests are issued
/// one at a time, so children always come out in document order.
pub struct Crawler {
    config: Arc<Config>,
    client: PortalClient,
    fetcher: PageFetcher,
    cache: DownloadCache,
    ids: IdRegistry,
    /// Download URL each destination was taken by during this run
    claims: HashMap<PathBuf, String>,
    ledger: Option<SqliteStorage>,
    config_hash: String,
    run_id: Option<i64>,
    last_step: String,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    /// * `client` - The client whose session the crawl runs in
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(ChefError)` - The base URL is invalid or the download
    ///   directory could not be created
    pub fn new(config: Config, client: PortalClient) -> Result<Self, ChefError> {
        let fetcher = PageFetcher::new(&config.portal.base_url, config.render.load_js)?;
        let cache = DownloadCache::new(&config.crawler.download_directory)?;
        let ids = IdRegistry::new(config.crawler.id_collisions);

        Ok(Self {
            config: Arc::new(config),
            client,
            fetcher,
            cache,
            ids,
            claims: HashMap::new(),
            ledger: None,
            config_hash: String::new(),
            run_id: None,
            last_step: String::from("start"),
        })
    }

    /// Records runs and downloaded assets in `ledger`
    pub fn with_ledger(mut self, ledger: SqliteStorage, config_hash: impl Into<String>) -> Self {
        self.ledger = Some(ledger);
        self.config_hash = config_hash.into();
        self
    }

    /// Description of the last step the crawl started
    pub fn last_step(&self) -> &str {
        &self.last_step
    }

    pub fn client(&self) -> &PortalClient {
        &self.client
    }

    /// Id of the ledger run, once started
    pub fn run_id(&self) -> Option<i64> {
        self.run_id
    }

    /// Hands the ledger back, e.g. to read statistics after a run
    pub fn into_ledger(self) -> Option<SqliteStorage> {
        self.ledger
    }

    /// Runs the crawl and returns the validated channel
    ///
    /// This:
    /// 1. Logs in
    /// 2. Walks the landing page's tabs and everything below them
    /// 3. Validates the finished tree
    pub async fn run(&mut self) -> Result<ChannelNode, ChefError> {
        self.begin_run()?;

        let result = self.construct_channel().await;

        match &result {
            Ok(channel) => {
                self.finish_run(true)?;
                tracing::info!(
                    "Crawl completed: {} top-level topics",
                    channel.children().len()
                );
            }
            Err(e) => {
                tracing::error!("Crawl failed at step '{}': {}", self.last_step, e);
                if let Err(ledger_error) = self.finish_run(false) {
                    tracing::warn!("Could not record failed run: {}", ledger_error);
                }
            }
        }

        result
    }

    async fn construct_channel(&mut self) -> Result<ChannelNode, ChefError> {
        let mut channel = ChannelNode::from_config(&self.config.channel);

        let login_url = self.fetcher.resolve(&self.config.portal.login_path)?;
        self.step(format!("login {}", login_url));
        self.client.login(login_url.as_str()).await?;

        self.scrape_source(&mut channel).await?;

        self.step("validate channel".to_string());
        validate_channel(&channel)?;

        Ok(channel)
    }

    async fn scrape_source(&mut self, channel: &mut ChannelNode) -> Result<(), ChefError> {
        tracing::info!("Scraping {}", self.fetcher.base());

        let config = Arc::clone(&self.config);
        let landing = config.portal.landing_path.as_str();
        self.step(format!("landing page {}", landing));
        let tabs = {
            let page = self.fetcher.get_soup(&self.client, landing).await?;
            parser::extract_tabs(&page)?
        };

        for tab in &tabs {
            match self.crawl_tab(tab).await {
                Ok(topic) => channel.add_child(topic),
                Err(e) => self.isolate(e, "curriculum", &tab.label)?,
            }
        }

        Ok(())
    }

    /// Builds one curriculum topic with everything below it
    async fn crawl_tab(&mut self, tab: &Tab) -> Result<TopicNode, ChefError> {
        tracing::info!("    Processing {} (curriculum)", tab.label);
        let mut topic = TopicNode::new(self.ids.assign(normalize(&tab.label)), &tab.label);

        let href = tab.href.as_deref().ok_or_else(|| ChefError::MissingMarkup {
            selector: "a[href]".to_string(),
            context: format!("tab '{}'", tab.label),
        })?;

        self.step(format!("curriculum {}", href));
        let columns = {
            let page = self.fetcher.get_soup(&self.client, href).await?;
            parser::extract_columns(&page)?
        };

        for column in columns {
            match column.heading {
                Some(heading) => {
                    let id = self
                        .ids
                        .assign(format!("{}-{}", topic.source_id, normalize(&heading)));
                    let mut column_topic = TopicNode::new(id, heading);
                    self.process_sections(&column.sections, &mut column_topic)
                        .await?;
                    topic.add_child(column_topic);
                }
                None => self.process_sections(&column.sections, &mut topic).await?,
            }
        }

        Ok(topic)
    }

    /// Attaches one topic per section, each holding its resources
    async fn process_sections(
        &mut self,
        sections: &[Section],
        parent: &mut TopicNode,
    ) -> Result<(), ChefError> {
        for section in sections {
            tracing::info!("        Processing {} (section)", section.header);
            let id = self
                .ids
                .assign(format!("{}-{}", parent.source_id, normalize(&section.header)));
            let mut subtopic = TopicNode::new(id, &section.header);

            for item in &section.items {
                match self.process_resource(item).await {
                    Ok(document) => subtopic.add_child(document),
                    Err(e) => self.isolate(e, "resource", &item.label)?,
                }
            }

            parent.add_child(subtopic);
        }

        Ok(())
    }

    /// Resolves a section item into a document node
    async fn process_resource(&mut self, item: &ResourceLink) -> Result<DocumentNode, ChefError> {
        let detail_url = item
            .detail_url
            .as_deref()
            .ok_or_else(|| ChefError::MissingMarkup {
                selector: format!("a[{}]", parser::DETAIL_ATTR),
                context: format!("item '{}'", item.label),
            })?;

        self.step(format!("resource {}", detail_url));
        let detail = {
            let page = self.fetcher.get_ajax_soup(&self.client, detail_url).await?;
            parser::extract_resource(&page)?
        };

        tracing::info!("            Processing {} (resource)", detail.title);

        // Needs the authenticated session, so it happens during the crawl
        let destination = self.cache.path_for(&detail.title);
        let download_url = self.fetcher.resolve(&detail.download_href)?;

        // Titles pick the file, so two documents sharing a title must share a link
        if let Some(claimed_by) = self.claims.get(&destination) {
            if claimed_by != download_url.as_str() {
                return Err(ChefError::DestinationConflict {
                    path: destination.display().to_string(),
                    url: download_url.to_string(),
                    claimed_by: claimed_by.clone(),
                });
            }
        }

        self.step(format!("download {}", download_url));
        let outcome = self
            .cache
            .ensure_downloaded(&self.client, download_url.as_str(), &destination)
            .await?;
        self.claims
            .insert(destination.clone(), download_url.to_string());

        if let DownloadOutcome::Fetched { bytes, sha256 } = outcome {
            self.record_asset(&destination, download_url.as_str(), bytes, sha256)?;
        }

        let channel = &self.config.channel;
        Ok(DocumentNode {
            source_id: self.ids.assign(detail.source_id),
            title: detail.title,
            license: channel.license,
            copyright_holder: channel.copyright_holder.clone(),
            description: detail.description,
            file: DocumentFile::new(destination),
        })
    }

    /// Applies the branch error policy to an error from one tab or resource
    fn isolate(&self, error: ChefError, kind: &str, label: &str) -> Result<(), ChefError> {
        if self.config.crawler.branch_errors == BranchErrorPolicy::Skip && error.is_branch_local()
        {
            tracing::warn!("Skipping {} '{}': {}", kind, label, error);
            Ok(())
        } else {
            Err(error)
        }
    }

    fn step(&mut self, description: String) {
        tracing::debug!("Step: {}", description);
        self.last_step = description;
    }

    fn begin_run(&mut self) -> Result<(), ChefError> {
        if let Some(ledger) = self.ledger.as_mut() {
            let run_id = ledger.create_run(&self.config_hash)?;
            tracing::info!("Starting run {}", run_id);
            self.run_id = Some(run_id);
        }
        Ok(())
    }

    fn finish_run(&mut self, succeeded: bool) -> Result<(), ChefError> {
        if let (Some(ledger), Some(run_id)) = (self.ledger.as_mut(), self.run_id) {
            if succeeded {
                ledger.complete_run(run_id)?;
            } else {
                ledger.fail_run(run_id, &self.last_step)?;
            }
        }
        Ok(())
    }

    fn record_asset(
        &mut self,
        destination: &Path,
        url: &str,
        bytes: u64,
        sha256: String,
    ) -> Result<(), ChefError> {
        if let (Some(ledger), Some(run_id)) = (self.ledger.as_mut(), self.run_id) {
            ledger.record_asset(&AssetRecord {
                path: destination.display().to_string(),
                url: url.to_string(),
                bytes,
                sha256,
                downloaded_at: chrono::Utc::now().to_rfc3339(),
                run_id,
            })?;
        }
        Ok(())
    }
}

/// Runs a complete crawl with a client built from `config`
pub async fn run_crawl(config: Config) -> Result<ChannelNode, ChefError> {
    let client = PortalClient::from_config(&config)?;
    let mut crawler = Crawler::new(config, client)?;
    crawler.run().await
}
