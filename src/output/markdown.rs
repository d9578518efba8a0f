//! Markdown outline generation
//!
//! This module renders a finished channel tree as a nested markdown list,
//! one line per topic and document, in crawl order.

use crate::tree::{ChannelNode, Node};
use crate::ChefError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the outline of `channel` to `output_path`
///
/// # Arguments
///
/// * `channel` - The validated channel tree
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the outline
/// * `Err(ChefError)` - Failed to write the file
pub fn write_outline(channel: &ChannelNode, output_path: &Path) -> Result<(), ChefError> {
    let markdown = format_outline(channel);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a channel tree as markdown
pub fn format_outline(channel: &ChannelNode) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", channel.title));

    md.push_str("## Channel Information\n\n");
    md.push_str(&format!("- **Source ID**: {}\n", channel.source_id));
    md.push_str(&format!("- **Source Domain**: {}\n", channel.source_domain));
    md.push_str(&format!("- **Language**: {}\n", channel.language));
    if let Some(description) = &channel.description {
        md.push_str(&format!("- **Description**: {}\n", description));
    }
    md.push('\n');

    md.push_str("## Contents\n\n");
    if channel.children().is_empty() {
        md.push_str("_No content found._\n");
    }
    for child in channel.children() {
        push_node(&mut md, child, 0);
    }

    md
}

fn push_node(md: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Topic(topic) => {
            md.push_str(&format!(
                "{}- **{}** (`{}`)\n",
                indent, topic.title, topic.source_id
            ));
            for child in topic.children() {
                push_node(md, child, depth + 1);
            }
        }
        Node::Document(document) => {
            md.push_str(&format!(
                "{}- {} (`{}`): `{}`\n",
                indent,
                document.title,
                document.source_id,
                document.file.path().display()
            ));
        }
    }
}
