use crate::ident::is_valid_identifier;
use crate::tree::{ChannelNode, DocumentNode, Node, TreeError};
use std::collections::HashMap;

/// Checks a fully constructed channel
///
/// Runs once after the crawl instead of on every `add_child`. Reports every
/// problem found:
/// - channel metadata must be non-empty
/// - node identifiers must be non-empty alphanumeric-or-hyphen strings
/// - node identifiers must be unique across the whole tree
/// - titles must be non-empty
/// - documents must point at a `.pdf` file and carry a copyright holder
///   unless their license is public domain
pub fn validate_channel(channel: &ChannelNode) -> Result<(), TreeError> {
    let mut problems = Vec::new();

    if channel.source_id.trim().is_empty() {
        problems.push("channel source id is empty".to_string());
    }
    if channel.title.trim().is_empty() {
        problems.push("channel title is empty".to_string());
    }
    if channel.language.trim().is_empty() {
        problems.push("channel language is empty".to_string());
    }

    let mut seen: HashMap<&str, String> = HashMap::new();
    let mut path = vec![channel.title.as_str()];
    for child in channel.children() {
        check_node(child, &mut path, &mut seen, &mut problems);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(TreeError::Invalid { problems })
    }
}

fn check_node<'a>(
    node: &'a Node,
    path: &mut Vec<&'a str>,
    seen: &mut HashMap<&'a str, String>,
    problems: &mut Vec<String>,
) {
    path.push(node.title());
    let location = path.join(" > ");
    let id = node.source_id();

    if !is_valid_identifier(id) {
        problems.push(format!("invalid source id '{}' at {}", id, location));
    }
    if let Some(first) = seen.get(id) {
        problems.push(format!(
            "duplicate source id '{}' at {} (first used at {})",
            id, location, first
        ));
    } else {
        seen.insert(id, location.clone());
    }
    if node.title().trim().is_empty() {
        problems.push(format!("empty title for '{}' at {}", id, location));
    }

    match node {
        Node::Topic(topic) => {
            for child in topic.children() {
                check_node(child, path, seen, problems);
            }
        }
        Node::Document(document) => check_document(document, &location, problems),
    }

    path.pop();
}

fn check_document(document: &DocumentNode, location: &str, problems: &mut Vec<String>) {
    let is_pdf = document
        .file
        .path()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        problems.push(format!(
            "document file {} at {} is not a PDF",
            document.file.path().display(),
            location
        ));
    }

    if document.license.requires_copyright_holder() && document.copyright_holder.trim().is_empty()
    {
        problems.push(format!(
            "missing copyright holder for '{}' license at {}",
            document.license, location
        ));
    }
}
