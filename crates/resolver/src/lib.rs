//! # Specforge Resolver
//!
//! Decides where each proposed change lands in the live specification document.
//!
//! ## Architecture
//!
//! ```text
//! batch text
//!     │
//!     ├──> parse_batch ──> UpdateIntent[]
//!     │
//!     ├──> HierarchicalChunker (per intent) ──> Chunk[]
//!     │
//!     └──> SectionResolver (per chunk, one DocumentSnapshot per batch)
//!            1. chunk declares a new Milestone/Feature header
//!            2. exact or path-suffix title match
//!            3. target explicitly asks for a new Feature/Milestone
//!            4. EmbeddingIndex nearest section, else unmatched
//! ```
//!
//! Resolution only reads: the results carry the before/after pair for a downstream merge step
//! and nothing is written back.
//!
//! ## Example
//!
//! ```no_run
//! use specforge_document::MemoryDocumentStore;
//! use specforge_resolver::UpdatePipeline;
//! use specforge_vector_store::{EmbeddingIndex, StubEmbedder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let documents = Arc::new(MemoryDocumentStore::with_document("spec", "# Spec\n## Aim\nGoal."));
//!     let index = Arc::new(EmbeddingIndex::new(documents.clone(), Arc::new(StubEmbedder::default())));
//!     let pipeline = UpdatePipeline::new(documents, index);
//!
//!     let batch = "<<<SPEC_START>>>\nTarget-Section: Aim\nChange-Summary: Sharpen\n## Aim\nBetter goal.\n<<<SPEC_END>>>";
//!     for result in pipeline.resolve_batch("spec", batch).await? {
//!         println!("{} <- {}", result.section_title, result.summary);
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod pipeline;
mod resolver;
mod snapshot;

pub use error::{ResolveError, Result};
pub use pipeline::UpdatePipeline;
pub use resolver::SectionResolver;
pub use snapshot::{DocumentSnapshot, SnapshotEntry};
