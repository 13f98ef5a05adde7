use crate::embeddings::{cosine_similarity, norm};
use crate::types::{EmbeddingRecord, SearchHit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

/// Whether a document's cached records still describe its current content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexState {
    /// Never built, or invalidated since the last build
    #[default]
    Dirty,
    /// Built from the content with this SHA-256
    Clean { content_hash: String },
}

/// Inspectable snapshot of one document's index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub state: IndexState,
    pub records: usize,
    pub rebuilds: usize,
}

/// Records of one document plus their freshness (brute-force search, documents are small)
#[derive(Debug, Default)]
pub(crate) struct DocumentIndex {
    records: Vec<EmbeddingRecord>,
    state: IndexState,
    rebuilds: usize,
    cache_checked: bool,
}

impl DocumentIndex {
    pub(crate) fn replace(&mut self, records: Vec<EmbeddingRecord>, content_hash: String) {
        self.records = records;
        self.state = IndexState::Clean { content_hash };
    }

    /// Keep `records` for search but stay dirty, so the next query rebuilds again
    pub(crate) fn replace_incomplete(&mut self, records: Vec<EmbeddingRecord>) {
        self.records = records;
        self.state = IndexState::Dirty;
    }

    pub(crate) fn record_rebuild(&mut self) {
        self.rebuilds += 1;
    }

    pub(crate) fn is_clean_for(&self, content_hash: &str) -> bool {
        matches!(&self.state, IndexState::Clean { content_hash: h } if h == content_hash)
    }

    /// Mark dirty and stop trusting the on-disk cache for this document
    pub(crate) fn invalidate(&mut self) {
        self.state = IndexState::Dirty;
        self.cache_checked = true;
    }

    /// Returns true the first time it is called, so the on-disk cache is consulted once
    pub(crate) fn take_cache_check(&mut self) -> bool {
        !std::mem::replace(&mut self.cache_checked, true)
    }

    pub(crate) fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    pub(crate) fn stats(&self) -> IndexStats {
        IndexStats {
            state: self.state.clone(),
            records: self.records.len(),
            rebuilds: self.rebuilds,
        }
    }

    /// Record with the highest cosine similarity to `probe`; the first one wins ties.
    ///
    /// Records whose vector is empty, zero-norm or of another dimension are never candidates.
    pub(crate) fn nearest(&self, probe: &[f32]) -> Option<SearchHit> {
        if probe.is_empty() || norm(probe) == 0.0 {
            return None;
        }

        let mut best: Option<(&EmbeddingRecord, f32)> = None;
        for record in &self.records {
            if record.vector.len() != probe.len() || norm(&record.vector) == 0.0 {
                continue;
            }
            let score = cosine_similarity(probe, &record.vector);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((record, score));
            }
        }

        best.map(|(record, score)| SearchHit {
            header: record.header.clone(),
            text: record.text.clone(),
            score,
        })
    }
}

pub(crate) type IndexSlot = Arc<AsyncMutex<DocumentIndex>>;

/// One async lock per document id, created on first use.
///
/// Slots of other documents that nobody holds are pruned once the map reaches
/// `capacity`; a pruned document is rebuilt (or reloaded from the vector cache) on next use.
#[derive(Debug)]
pub(crate) struct IndexRegistry {
    slots: Mutex<HashMap<String, IndexSlot>>,
    capacity: usize,
}

pub(crate) const DEFAULT_REGISTRY_CAPACITY: usize = 64;

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl IndexRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn slot(&self, doc_id: &str) -> IndexSlot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(doc_id) {
            return slot.clone();
        }
        if slots.len() >= self.capacity {
            let before = slots.len();
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            log::debug!("Pruned {} idle embedding indexes", before - slots.len());
        }
        slots.entry(doc_id.to_string()).or_default().clone()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
