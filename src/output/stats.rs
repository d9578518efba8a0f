//! Statistics for a finished crawl
//!
//! Tree statistics are computed from the channel a crawl returns. Ledger
//! statistics are read back from the run ledger and cover every run.

use crate::storage::{RunRecord, RunStatus, Storage};
use crate::tree::{ChannelNode, Node};
use crate::ChefError;

/// Node counts of a channel tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    /// Topics at every depth
    pub topics: usize,

    /// Documents at every depth
    pub documents: usize,

    /// Topics without any child
    pub empty_topics: usize,

    /// Deepest level below the channel, top-level topics being 1
    pub max_depth: usize,
}

impl TreeStatistics {
    /// Walks `channel` and counts its nodes
    pub fn from_channel(channel: &ChannelNode) -> Self {
        let mut stats = Self::default();
        for child in channel.children() {
            stats.visit(child, 1);
        }
        stats
    }

    fn visit(&mut self, node: &Node, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        match node {
            Node::Topic(topic) => {
                self.topics += 1;
                if topic.children().is_empty() {
                    self.empty_topics += 1;
                }
                for child in topic.children() {
                    self.visit(child, depth + 1);
                }
            }
            Node::Document(_) => self.documents += 1,
        }
    }
}

/// Run ledger summary
#[derive(Debug, Clone)]
pub struct LedgerStatistics {
    pub completed_runs: usize,
    pub failed_runs: usize,
    pub running_runs: usize,

    /// Documents downloaded across all runs
    pub assets: usize,

    /// Total size of those documents
    pub asset_bytes: u64,

    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from the ledger
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(LedgerStatistics)` - Successfully loaded statistics
/// * `Err(ChefError)` - Failed to query the ledger
pub fn load_statistics(storage: &dyn Storage) -> Result<LedgerStatistics, ChefError> {
    Ok(LedgerStatistics {
        completed_runs: storage.count_runs_by_status(RunStatus::Completed)?,
        failed_runs: storage.count_runs_by_status(RunStatus::Failed)?,
        running_runs: storage.count_runs_by_status(RunStatus::Running)?,
        assets: storage.count_assets()?,
        asset_bytes: storage.total_asset_bytes()?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints tree statistics to stdout
pub fn print_tree_statistics(channel: &ChannelNode, stats: &TreeStatistics) {
    println!("=== Channel: {} ===\n", channel.title);

    println!("Contents:");
    println!("  Top-level topics: {}", channel.children().len());
    println!("  Topics: {}", stats.topics);
    println!("  Documents: {}", stats.documents);
    println!("  Maximum depth: {}", stats.max_depth);

    if stats.empty_topics > 0 {
        println!("  Empty topics: {}", stats.empty_topics);
    }
    println!();
}

/// Prints ledger statistics to stdout
pub fn print_statistics(stats: &LedgerStatistics) {
    println!("=== Run Ledger ===\n");

    println!("Runs:");
    println!("  Completed: {}", stats.completed_runs);
    println!("  Failed: {}", stats.failed_runs);
    if stats.running_runs > 0 {
        println!("  Unfinished: {}", stats.running_runs);
    }
    println!();

    println!("Downloads:");
    println!("  Documents: {}", stats.assets);
    println!(
        "  Total size: {} bytes ({:.2} MiB)",
        stats.asset_bytes,
        stats.asset_bytes as f64 / (1024.0 * 1024.0)
    );
    println!();

    if let Some(run) = &stats.latest_run {
        println!("Latest run #{}:", run.id);
        println!("  Status: {}", run.status.to_db_string());
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        if let Some(step) = &run.last_step {
            println!("  Last step: {}", step);
        }
    }
}
