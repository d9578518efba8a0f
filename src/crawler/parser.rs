//! Markup extraction for the portal's curriculum pages
//!
//! Each function turns a parsed [`Page`] into plain owned data so the page
//! can be dropped before the next request is made:
//! - the landing page yields curriculum tabs
//! - a tab page yields column groups of definition-list sections
//! - a resource detail pane yields the resource's identifier and metadata

use crate::crawler::fetcher::Page;
use crate::ChefError;
use scraper::{ElementRef, Selector};

const TAB_SELECTOR: &str = "li.tab-title";
const LINK_SELECTOR: &str = "a[href]";
const COLUMN_SELECTOR: &str = "div.columns";
const HEADING_SELECTOR: &str = "h2";
const SECTION_SELECTOR: &str = "dl";
const SECTION_HEADER_SELECTOR: &str = "dt";
const ITEM_SELECTOR: &str = "dd";
const ANCHOR_SELECTOR: &str = "a";
const TITLE_SELECTOR: &str = "span#module-large-title";
const DESCRIPTION_SELECTOR: &str = "span#module-large-description";
const DOWNLOAD_SELECTOR: &str = "a#module-dl";

/// Attribute on a section item's anchor naming its detail pane
pub const DETAIL_ATTR: &str = "data-reveal-ajax";

/// A curriculum tab on the landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    /// Target of the tab's first link, if it has one
    pub href: Option<String>,
}

/// A column group on a curriculum page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Text of the column's first `h2`; columns without one are flattened
    pub heading: Option<String>,
    pub sections: Vec<Section>,
}

/// A definition-list block inside a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    pub items: Vec<ResourceLink>,
}

/// One `dd` entry pointing at a resource detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub label: String,
    pub detail_url: Option<String>,
}

/// Metadata scraped from a resource detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDetail {
    /// `"{data-id}-{data-token}"` of the pane's control link
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub download_href: String,
}

fn selector(css: &str) -> Result<Selector, ChefError> {
    Selector::parse(css).map_err(|e| ChefError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn missing(selector: &str, page: &Page) -> ChefError {
    ChefError::MissingMarkup {
        selector: selector.to_string(),
        context: page.url.to_string(),
    }
}

/// Extracts the curriculum tabs of the landing page in document order
pub fn extract_tabs(page: &Page) -> Result<Vec<Tab>, ChefError> {
    let tab_selector = selector(TAB_SELECTOR)?;
    let link_selector = selector(LINK_SELECTOR)?;

    let tabs = page
        .document
        .select(&tab_selector)
        .map(|tab| Tab {
            label: text_of(tab),
            href: tab
                .select(&link_selector)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string),
        })
        .collect();

    Ok(tabs)
}

/// Extracts the column groups of a curriculum page in document order
///
/// Fails if a definition list has no `dt` header.
pub fn extract_columns(page: &Page) -> Result<Vec<Column>, ChefError> {
    let column_selector = selector(COLUMN_SELECTOR)?;
    let heading_selector = selector(HEADING_SELECTOR)?;
    let section_selector = selector(SECTION_SELECTOR)?;
    let header_selector = selector(SECTION_HEADER_SELECTOR)?;
    let item_selector = selector(ITEM_SELECTOR)?;
    let anchor_selector = selector(ANCHOR_SELECTOR)?;

    let mut columns = Vec::new();
    for column in page.document.select(&column_selector) {
        let heading = column.select(&heading_selector).next().map(text_of);

        let mut sections = Vec::new();
        for section in column.select(&section_selector) {
            let header = section
                .select(&header_selector)
                .next()
                .map(text_of)
                .ok_or_else(|| missing(SECTION_HEADER_SELECTOR, page))?;

            let items = section
                .select(&item_selector)
                .map(|item| ResourceLink {
                    label: text_of(item),
                    detail_url: item
                        .select(&anchor_selector)
                        .next()
                        .and_then(|a| a.value().attr(DETAIL_ATTR))
                        .map(str::to_string),
                })
                .collect();

            sections.push(Section { header, items });
        }

        columns.push(Column { heading, sections });
    }

    Ok(columns)
}

/// Extracts a resource's identifier and metadata from its detail pane
///
/// The identifier comes from the first anchor carrying both `data-id` and
/// `data-token`, wherever it sits among the other anchors.
pub fn extract_resource(page: &Page) -> Result<ResourceDetail, ChefError> {
    let anchor_selector = selector(ANCHOR_SELECTOR)?;
    let title_selector = selector(TITLE_SELECTOR)?;
    let description_selector = selector(DESCRIPTION_SELECTOR)?;
    let download_selector = selector(DOWNLOAD_SELECTOR)?;

    let source_id = page
        .document
        .select(&anchor_selector)
        .find_map(|a| {
            let id = a.value().attr("data-id").filter(|v| !v.is_empty())?;
            let token = a.value().attr("data-token").filter(|v| !v.is_empty())?;
            Some(format!("{}-{}", id, token))
        })
        .ok_or_else(|| ChefError::NoIdentifier {
            url: page.url.to_string(),
        })?;

    let title = page
        .document
        .select(&title_selector)
        .next()
        .map(text_of)
        .ok_or_else(|| missing(TITLE_SELECTOR, page))?;

    let description = page
        .document
        .select(&description_selector)
        .next()
        .map(text_of)
        .ok_or_else(|| missing(DESCRIPTION_SELECTOR, page))?;

    let download_href = page
        .document
        .select(&download_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| missing(DOWNLOAD_SELECTOR, page))?;

    Ok(ResourceDetail {
        source_id,
        title,
        description,
        download_href,
    })
}
