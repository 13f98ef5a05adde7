//! # Specforge Vector Store
//!
//! Section embeddings for the semantic tier of the update resolver.
//!
//! ## Features
//!
//! - **One record per section**: documents are split at every heading, whatever its depth
//! - **Pluggable providers**: Ollama over HTTP, or a deterministic offline stub
//! - **Consistency first**: the index is rebuilt from the live document before a query,
//!   either always or whenever the document's content hash changed
//! - **Per-document serialization** of rebuild and query
//! - **Optional JSON cache** of the last build per document
//!
//! ## Architecture
//!
//! ```text
//! DocumentStore ──> live Markdown
//!     │
//!     ├──> SectionSplitter (flat)
//!     │      └─> (header, text)[]
//!     │
//!     ├──> EmbeddingProvider
//!     │      └─> Vec<f32> per section (empty on failure)
//!     │
//!     └──> DocumentIndex
//!            └─> brute-force cosine nearest neighbour
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use specforge_document::MemoryDocumentStore;
//! use specforge_vector_store::{EmbeddingIndex, StubEmbedder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let documents = Arc::new(MemoryDocumentStore::with_document("spec", "# Spec\n## Aim\nGoal."));
//!     let index = EmbeddingIndex::new(documents, Arc::new(StubEmbedder::default()));
//!
//!     if let Some(hit) = index.query("spec", "Aim\n## Aim\nGoal.").await {
//!         println!("{}: {:.3}", hit.header, hit.score);
//!     }
//! }
//! ```

mod embedding_cache;
mod embeddings;
mod error;
mod index;
mod ollama;
mod store;
mod types;

pub use embedding_cache::EmbeddingCache;
pub use embeddings::{cosine_similarity, EmbeddingProvider, StubEmbedder};
pub use error::{Result, VectorStoreError};
pub use index::{IndexState, IndexStats};
pub use ollama::{OllamaEmbedder, DEFAULT_EMBED_MODEL, DEFAULT_EMBED_TIMEOUT, DEFAULT_OLLAMA_HOST};
pub use store::{content_hash, EmbeddingIndex, RebuildPolicy};
pub use types::{EmbeddingRecord, SearchHit};
