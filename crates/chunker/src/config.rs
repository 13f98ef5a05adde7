use serde::{Deserialize, Serialize};

/// Header given to text that precedes the first heading of a document
pub const DEFAULT_INTRODUCTION_TITLE: &str = "Introduction";

/// Configuration for Markdown chunking behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Chunking strategy to use
    pub strategy: ChunkingStrategy,

    /// Header assigned to leading text by the flat strategy
    pub introduction_title: String,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::Hierarchical,
            introduction_title: DEFAULT_INTRODUCTION_TITLE.to_string(),
        }
    }
}

impl ChunkerConfig {
    /// Config for splitting a change body into coherent units
    pub fn for_intents() -> Self {
        Self::default()
    }

    /// Config for splitting a live document into one entry per section
    pub fn for_index() -> Self {
        Self {
            strategy: ChunkingStrategy::Flat,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.introduction_title.trim().is_empty() {
            return Err("introduction_title must not be empty".to_string());
        }
        Ok(())
    }
}

/// Strategy for splitting Markdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// A header starts a new chunk only at the same or a shallower level than the
    /// chunk's own header; deeper headers stay nested in the current chunk
    Hierarchical,

    /// Every header line starts a new chunk, regardless of depth
    Flat,
}
