use crate::error::{DocumentError, Result};
use crate::structure::{parse_structure, Section};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Read side of a document store, as seen by the resolution pipeline.
///
/// A document that does not exist reads as empty text (and therefore an empty structure);
/// only store failures are errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current Markdown of `doc_id`
    async fn get_document(&self, doc_id: &str) -> Result<String>;

    /// Flat section list of `doc_id`, in document order
    async fn get_structure(&self, doc_id: &str) -> Result<Vec<Section>> {
        let document = self.get_document(doc_id).await?;
        Ok(parse_structure(&document))
    }
}

/// Documents held in memory, keyed by id
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc_id: impl Into<String>, content: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut documents) = store.documents.write() {
            documents.insert(doc_id.into(), content.into());
        }
        store
    }

    /// Insert or replace a document
    pub fn put(&self, doc_id: impl Into<String>, content: impl Into<String>) -> Result<()> {
        let mut documents = self.documents.write().map_err(|_| {
            DocumentError::Unavailable("Failed to lock in-memory documents".into())
        })?;
        documents.insert(doc_id.into(), content.into());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_document(&self, doc_id: &str) -> Result<String> {
        let documents = self.documents.read().map_err(|_| {
            DocumentError::Unavailable("Failed to lock in-memory documents".into())
        })?;
        Ok(documents.get(doc_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_document_reads_empty() {
        let store = MemoryDocumentStore::new();
        assert_eq!(store.get_document("nope").await.unwrap(), "");
        assert!(store.get_structure("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_replaces_content() {
        let store = MemoryDocumentStore::with_document("spec", "# One");
        store.put("spec", "# Two\n## Child").unwrap();
        let structure = store.get_structure("spec").await.unwrap();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure[0].title, "Two");
    }
}
