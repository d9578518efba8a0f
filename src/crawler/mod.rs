//! Crawler module for walking the portal's curriculum
//!
//! This module contains the core crawling logic, including:
//! - Page fetching and link resolution
//! - Markup extraction for tabs, columns, sections and resources
//! - The download cache for resource documents
//! - Overall crawl coordination

mod coordinator;
mod download;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Crawler};
pub use download::{DownloadCache, DownloadOutcome};
pub use fetcher::{Page, PageFetcher};
pub use parser::{
    extract_columns, extract_resource, extract_tabs, Column, ResourceDetail, ResourceLink,
    Section, Tab, DETAIL_ATTR,
};

use crate::config::Config;
use crate::tree::ChannelNode;
use crate::ChefError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the authenticated client
/// 2. Log in
/// 3. Walk the curriculum and download every resource document
/// 4. Validate and return the channel tree
///
/// # Arguments
///
/// * `config` - The chef configuration
///
/// # Returns
///
/// * `Ok(ChannelNode)` - The validated channel
/// * `Err(ChefError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<ChannelNode, ChefError> {
    run_crawl(config).await
}
