use crate::error::{ResolveError, Result};
use crate::resolver::SectionResolver;
use crate::snapshot::DocumentSnapshot;
use specforge_chunker::HierarchicalChunker;
use specforge_document::DocumentStore;
use specforge_protocol::{parse_batch, ProcessResponse, ResolutionResult};
use specforge_vector_store::EmbeddingIndex;
use std::sync::Arc;

/// Batch text in, resolution results out.
///
/// One snapshot of the document is taken per batch; blocks and their chunks are resolved
/// strictly in order against it. Applying a result before resolving the next chunk is the
/// caller's business.
pub struct UpdatePipeline {
    documents: Arc<dyn DocumentStore>,
    resolver: SectionResolver,
}

impl UpdatePipeline {
    pub fn new(documents: Arc<dyn DocumentStore>, index: Arc<EmbeddingIndex>) -> Self {
        Self {
            documents,
            resolver: SectionResolver::new(index),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &SectionResolver {
        &self.resolver
    }

    pub async fn snapshot(&self, doc_id: &str) -> Result<DocumentSnapshot> {
        Ok(DocumentSnapshot::capture(self.documents.as_ref(), doc_id).await?)
    }

    /// Resolve every chunk of every block in `text` against `doc_id`.
    ///
    /// Fails only when the batch has no protocol block or the store cannot produce the
    /// document's structure.
    pub async fn resolve_batch(&self, doc_id: &str, text: &str) -> Result<Vec<ResolutionResult>> {
        log::info!("PROCESS '{doc_id}': analyzing input ({} chars)", text.len());
        let intents = parse_batch(text)?;
        let snapshot = self.snapshot(doc_id).await?;

        let mut results = Vec::new();
        for (i, intent) in intents.iter().enumerate() {
            let chunks = HierarchicalChunker::split(&intent.raw_body);
            log::info!(
                "  Block {}: intent '{}', split into {} chunks",
                i + 1,
                intent.target_path,
                chunks.len()
            );
            for chunk in &chunks {
                if let Some(result) = self.resolver.resolve_chunk(intent, chunk, &snapshot).await {
                    results.push(result);
                }
            }
        }

        log::info!("PROCESS '{doc_id}': {} resolutions", results.len());
        Ok(results)
    }

    /// [`Self::resolve_batch`] wrapped in the response envelope.
    ///
    /// A batch without protocol blocks becomes an error envelope; store failures stay errors.
    pub async fn process(&self, doc_id: &str, text: &str) -> Result<ProcessResponse> {
        match self.resolve_batch(doc_id, text).await {
            Ok(matches) => Ok(ProcessResponse::Success { matches }),
            Err(ResolveError::NoProtocol) => {
                log::warn!("PROCESS '{doc_id}' failed: no protocol blocks found");
                Ok(ProcessResponse::no_protocol())
            }
            Err(err) => Err(err),
        }
    }
}
