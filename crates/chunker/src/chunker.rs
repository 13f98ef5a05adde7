use crate::config::{ChunkerConfig, ChunkingStrategy};
use crate::error::{ChunkerError, Result};
use crate::strategy::{HierarchicalChunker, SectionSplitter};
use crate::types::Chunk;

/// Main chunker interface for processing Markdown
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk Markdown with the configured strategy
    #[must_use]
    pub fn chunk(&self, content: &str) -> Vec<Chunk> {
        let chunks = match self.config.strategy {
            ChunkingStrategy::Hierarchical => HierarchicalChunker::split(content),
            ChunkingStrategy::Flat => {
                SectionSplitter::new(self.config.introduction_title.as_str()).split(content)
            }
        };
        log::debug!(
            "{:?} chunking produced {} chunks from {} chars",
            self.config.strategy,
            chunks.len(),
            content.len()
        );
        chunks
    }
}
