use crate::embedding_cache::{CachedIndex, EmbeddingCache};
use crate::embeddings::EmbeddingProvider;
use crate::error::VectorStoreError;
use crate::index::{DocumentIndex, IndexRegistry, IndexSlot, IndexStats};
use crate::types::{EmbeddingRecord, SearchHit};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use specforge_chunker::{SectionSplitter, DEFAULT_INTRODUCTION_TITLE};
use specforge_document::DocumentStore;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// When a query re-embeds the document before searching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RebuildPolicy {
    /// Re-chunk and re-embed on every query
    #[default]
    #[serde(rename = "always")]
    Always,
    /// Re-embed only when the document's content hash differs from the indexed one,
    /// or after [`EmbeddingIndex::invalidate`]
    #[serde(rename = "on-change")]
    OnContentChange,
}

impl FromStr for RebuildPolicy {
    type Err = VectorStoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "on-change" | "on_change" | "on-content-change" => Ok(Self::OnContentChange),
            other => Err(VectorStoreError::InvalidPolicy(other.to_string())),
        }
    }
}

/// SHA-256 of a document body, hex encoded
#[must_use]
pub fn content_hash(document: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Per-document section embeddings with nearest-neighbour lookup.
///
/// Each document id has its own async lock, held across rebuild and search, so two requests
/// against the same document never interleave their rebuilds. Different documents proceed
/// independently.
pub struct EmbeddingIndex {
    documents: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    splitter: SectionSplitter,
    policy: RebuildPolicy,
    cache: Option<EmbeddingCache>,
    registry: IndexRegistry,
}

impl EmbeddingIndex {
    pub fn new(documents: Arc<dyn DocumentStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            documents,
            embedder,
            splitter: SectionSplitter::new(DEFAULT_INTRODUCTION_TITLE),
            policy: RebuildPolicy::default(),
            cache: None,
            registry: IndexRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RebuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Persist every rebuild under `dir` (and reuse it on start-up under
    /// [`RebuildPolicy::OnContentChange`])
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache = Some(EmbeddingCache::new(dir));
        self
    }

    #[must_use]
    pub const fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    /// Re-derive the index of `doc_id` from its current content. Returns the record count.
    pub async fn rebuild(&self, doc_id: &str) -> usize {
        let slot = self.slot(doc_id);
        let mut index = slot.lock().await;
        let document = self.read_document(doc_id).await;
        self.rebuild_locked(doc_id, &mut index, document.as_deref())
            .await;
        index.records().len()
    }

    /// Section of `doc_id` closest to `probe`.
    ///
    /// `None` when the document has no sections, the probe cannot be embedded, or no section
    /// has a usable embedding.
    pub async fn query(&self, doc_id: &str, probe: &str) -> Option<SearchHit> {
        let slot = self.slot(doc_id);
        let mut index = slot.lock().await;
        let document = self.read_document(doc_id).await;
        self.refresh_locked(doc_id, &mut index, document.as_deref())
            .await;

        if index.records().is_empty() {
            log::debug!("Embedding index for '{doc_id}' is empty");
            return None;
        }

        let probe_vector = self.embedder.embed(probe).await;
        if probe_vector.is_empty() {
            log::warn!("No embedding for probe against '{doc_id}'; semantic search skipped");
            return None;
        }

        let hit = index.nearest(&probe_vector);
        match &hit {
            Some(hit) => log::debug!("Nearest section '{}' (score {:.3})", hit.header, hit.score),
            None => log::debug!("No section of '{doc_id}' has a usable embedding"),
        }
        hit
    }

    /// Force the next query of `doc_id` to rebuild
    pub async fn invalidate(&self, doc_id: &str) {
        let slot = self.slot(doc_id);
        slot.lock().await.invalidate();
        log::debug!("Embedding index for '{doc_id}' marked dirty");
    }

    pub async fn stats(&self, doc_id: &str) -> IndexStats {
        let slot = self.slot(doc_id);
        let index = slot.lock().await;
        index.stats()
    }

    pub async fn records(&self, doc_id: &str) -> Vec<EmbeddingRecord> {
        let slot = self.slot(doc_id);
        let index = slot.lock().await;
        index.records().to_vec()
    }

    fn slot(&self, doc_id: &str) -> IndexSlot {
        self.registry.slot(doc_id)
    }

    /// `None` when the store fails; indexed as an empty document but never marked clean
    async fn read_document(&self, doc_id: &str) -> Option<String> {
        match self.documents.get_document(doc_id).await {
            Ok(document) => Some(document),
            Err(err) => {
                log::warn!("Cannot read '{doc_id}' for indexing: {err}");
                None
            }
        }
    }

    async fn refresh_locked(
        &self,
        doc_id: &str,
        index: &mut DocumentIndex,
        document: Option<&str>,
    ) {
        let Some(content) = document else {
            self.rebuild_locked(doc_id, index, None).await;
            return;
        };
        if self.policy == RebuildPolicy::Always {
            self.rebuild_locked(doc_id, index, document).await;
            return;
        }

        let hash = content_hash(content);
        if index.take_cache_check() {
            if let Some(cache) = &self.cache {
                if let Some(cached) = cache.load(doc_id).await {
                    if cached.content_hash == hash && cached.is_complete() {
                        log::debug!("Reusing cached embeddings for '{doc_id}'");
                        index.replace(cached.records, cached.content_hash);
                    }
                }
            }
        }

        if index.is_clean_for(&hash) {
            log::debug!("Embedding index for '{doc_id}' is clean");
            return;
        }
        self.rebuild_locked(doc_id, index, document).await;
    }

    async fn rebuild_locked(
        &self,
        doc_id: &str,
        index: &mut DocumentIndex,
        document: Option<&str>,
    ) {
        let content = document.unwrap_or_default();
        let chunks = self.splitter.split(content);

        let mut complete = document.is_some();
        let mut records = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let text = chunk.text();
            let header = chunk
                .header_title
                .unwrap_or_else(|| DEFAULT_INTRODUCTION_TITLE.to_string());
            let vector = self.embedder.embed(&text).await;
            if vector.is_empty() {
                log::warn!("No embedding for section '{header}' of '{doc_id}'");
                complete = false;
            }
            records.push(EmbeddingRecord {
                header,
                text,
                vector,
            });
        }

        log::info!(
            "Rebuilt embedding index for '{doc_id}': {} sections",
            records.len()
        );
        index.record_rebuild();

        if !complete {
            log::warn!("Embedding index for '{doc_id}' is incomplete; it stays dirty");
            index.replace_incomplete(records);
            return;
        }

        let hash = content_hash(content);
        index.replace(records, hash.clone());
        if let Some(cache) = &self.cache {
            let cached = CachedIndex::new(hash, index.records().to_vec());
            if let Err(err) = cache.store(doc_id, &cached).await {
                log::warn!("Failed to write vector cache for '{doc_id}': {err}");
            }
        }
    }
}
