//! Output module for reporting crawl results
//!
//! This module handles:
//! - Writing a markdown outline of the finished channel
//! - Computing and printing tree and ledger statistics

mod markdown;
pub mod stats;

pub use markdown::{format_outline, write_outline};
pub use stats::{
    load_statistics, print_statistics, print_tree_statistics, LedgerStatistics, TreeStatistics,
};
