use crate::config::ChannelConfig;
use crate::tree::License;
use std::path::{Path, PathBuf};

/// Any node below the channel root
#[derive(Debug, Clone)]
pub enum Node {
    Topic(TopicNode),
    Document(DocumentNode),
}

impl Node {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Topic(topic) => &topic.source_id,
            Self::Document(document) => &document.source_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Topic(topic) => &topic.title,
            Self::Document(document) => &document.title,
        }
    }

    /// Children of a topic; documents have none
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Topic(topic) => topic.children(),
            Self::Document(_) => &[],
        }
    }
}

impl From<TopicNode> for Node {
    fn from(topic: TopicNode) -> Self {
        Self::Topic(topic)
    }
}

impl From<DocumentNode> for Node {
    fn from(document: DocumentNode) -> Self {
        Self::Document(document)
    }
}

/// Root of the content tree
#[derive(Debug, Clone)]
pub struct ChannelNode {
    pub source_domain: String,
    pub source_id: String,
    pub title: String,
    pub language: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    children: Vec<Node>,
}

impl ChannelNode {
    pub fn new(
        source_domain: impl Into<String>,
        source_id: impl Into<String>,
        title: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            source_domain: source_domain.into(),
            source_id: source_id.into(),
            title: title.into(),
            language: language.into(),
            description: None,
            thumbnail: None,
            children: Vec::new(),
        }
    }

    /// Creates an empty channel from its configured metadata
    pub fn from_config(config: &ChannelConfig) -> Self {
        let mut channel = Self::new(
            &config.source_domain,
            &config.source_id,
            &config.name,
            &config.language,
        );
        channel.description = config.description.clone();
        channel.thumbnail = config.thumbnail.clone();
        channel
    }

    /// Appends a child after the existing ones
    pub fn add_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// Curriculum, column group or section
#[derive(Debug, Clone)]
pub struct TopicNode {
    pub source_id: String,
    pub title: String,
    children: Vec<Node>,
}

impl TopicNode {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Appends a child after the existing ones
    pub fn add_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// A downloaded resource
#[derive(Debug, Clone)]
pub struct DocumentNode {
    pub source_id: String,
    pub title: String,
    pub license: License,
    pub copyright_holder: String,
    pub description: String,
    pub file: DocumentFile,
}

/// Local document file backing a [`DocumentNode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
