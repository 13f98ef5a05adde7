use crate::error::Result;
use crate::types::EmbeddingRecord;
use serde::{Deserialize, Serialize};
use specforge_document::safe_document_name;
use std::path::{Path, PathBuf};

const CACHE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CachedIndex {
    pub schema_version: u32,
    pub content_hash: String,
    pub records: Vec<EmbeddingRecord>,
}

impl CachedIndex {
    pub(crate) fn new(content_hash: String, records: Vec<EmbeddingRecord>) -> Self {
        Self {
            schema_version: CACHE_SCHEMA_VERSION,
            content_hash,
            records,
        }
    }

    /// Every record carries a vector
    pub(crate) fn is_complete(&self) -> bool {
        self.records.iter().all(|record| !record.vector.is_empty())
    }
}

/// `<dir>/<safe_name>_vectors.json` files, one per document
#[derive(Clone, Debug)]
pub struct EmbeddingCache {
    base_dir: PathBuf,
}

impl EmbeddingCache {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn vector_path(&self, doc_id: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}_vectors.json", safe_document_name(doc_id)))
    }

    /// Cached index for `doc_id`; `None` when missing, unreadable or from another schema
    pub(crate) async fn load(&self, doc_id: &str) -> Option<CachedIndex> {
        let path = self.vector_path(doc_id);
        let bytes = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice::<CachedIndex>(&bytes) {
            Ok(cached) if cached.schema_version == CACHE_SCHEMA_VERSION => Some(cached),
            Ok(_) => None,
            Err(err) => {
                log::warn!("Ignoring unreadable vector cache {}: {err}", path.display());
                None
            }
        }
    }

    pub(crate) async fn store(&self, doc_id: &str, cached: &CachedIndex) -> Result<()> {
        let path = self.vector_path(doc_id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(cached)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }
}
