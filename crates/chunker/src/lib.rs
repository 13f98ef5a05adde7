//! # Specforge Chunker
//!
//! Header-aware splitting of Markdown for the update resolution pipeline.
//!
//! ## Philosophy
//!
//! Two different questions need two different splitters:
//! - *"What is one coherent change unit?"*: a proposed change keeps sub-headers together with
//!   their parent and only starts a new unit at a sibling or shallower header
//!   ([`ChunkingStrategy::Hierarchical`]).
//! - *"What is one addressable section?"*: the live document is indexed one entry per header,
//!   whatever its depth ([`ChunkingStrategy::Flat`]).
//!
//! ## Architecture
//!
//! ```text
//! Markdown text
//!     │
//!     ├──> Hierarchical (change bodies)
//!     │     └─> flush on header level ≤ current level, nest deeper headers
//!     │
//!     └──> Flat (document index)
//!           └─> flush on every `#` line, leading text becomes "Introduction"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use specforge_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::for_intents()).unwrap();
//! let chunks = chunker.chunk("### Feature A\n#### Context\nA.\n### Feature B\nB.");
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].header_title.as_deref(), Some("Feature A"));
//! assert_eq!(chunks[1].text(), "### Feature B\nB.");
//! ```

mod chunker;
mod config;
mod error;
mod heading;
mod strategy;
mod types;

pub use chunker::Chunker;
pub use config::{ChunkerConfig, ChunkingStrategy, DEFAULT_INTRODUCTION_TITLE};
pub use error::{ChunkerError, Result};
pub use heading::{parse_heading, Heading};
pub use strategy::{HierarchicalChunker, SectionSplitter};
pub use types::Chunk;
