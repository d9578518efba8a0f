//! Content tree handed to the catalog
//!
//! The crawl produces a [`ChannelNode`] whose children are topics (curricula,
//! column groups, sections) and documents (downloaded resources). Nodes are
//! appended with `add_child`; the finished tree is checked once with
//! [`validate_channel`].

mod license;
mod node;
mod validation;

pub use license::License;
pub use node::{ChannelNode, DocumentFile, DocumentNode, Node, TopicNode};
pub use validation::validate_channel;

use thiserror::Error;

/// Errors found while validating a constructed tree
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid channel tree ({} problems): {}", .problems.len(), .problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl TreeError {
    /// Every problem found, in tree order
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Invalid { problems } => problems,
        }
    }
}
