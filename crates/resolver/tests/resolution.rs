use async_trait::async_trait;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specforge_chunker::HierarchicalChunker;
use specforge_document::{DocumentError, DocumentStore, MemoryDocumentStore};
use specforge_protocol::{
    parse_batch, render_block, OriginalText, ProcessResponse, ResolutionResult,
    ResolutionStrategy, UpdateIntent,
};
use specforge_resolver::{ResolveError, UpdatePipeline};
use specforge_vector_store::{EmbeddingIndex, EmbeddingProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SPEC: &str = "# Project Spec\n\
                    ## Context, Aim & Integration\n\
                    Why this exists.\n\
                    ### Integration\n\
                    Talks to the billing API.\n\
                    ## Roadmap\n\
                    ### Milestone 1\n\
                    Prototype.\n\
                    ## Economy\n\
                    Gold and trade between towns.";

/// Provider that cannot embed anything, counting how often it was asked
#[derive(Default)]
struct NoEmbeddings {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for NoEmbeddings {
    async fn embed(&self, _text: &str) -> Vec<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }
}

/// Bag-of-keywords vectors
struct Keywords;

#[async_trait]
impl EmbeddingProvider for Keywords {
    async fn embed(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        ["gold", "trade", "billing", "prototype"]
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect()
    }
}

struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn get_document(&self, _doc_id: &str) -> specforge_document::Result<String> {
        Err(DocumentError::Unavailable("disk on fire".to_string()))
    }
}

fn pipeline_with(embedder: Arc<dyn EmbeddingProvider>) -> UpdatePipeline {
    let documents = Arc::new(MemoryDocumentStore::with_document("spec", SPEC));
    let index = Arc::new(EmbeddingIndex::new(documents.clone(), embedder));
    UpdatePipeline::new(documents, index)
}

fn block(target: &str, summary: &str, body: &str) -> String {
    render_block(&UpdateIntent::new(target, summary, body))
}

async fn resolve(pipeline: &UpdatePipeline, batch: &str) -> Vec<ResolutionResult> {
    pipeline.resolve_batch("spec", batch).await.expect("resolve")
}

#[tokio::test]
async fn chunk_header_overrides_target() {
    let embedder = Arc::new(NoEmbeddings::default());
    let pipeline = pipeline_with(embedder.clone());

    for target in ["Roadmap", "Economy", "Something else entirely"] {
        let batch = block(target, "Add milestone", "### Milestone 3\nShip it.");
        let results = resolve(&pipeline, &batch).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].section_title, "Milestone 3");
        assert_eq!(results[0].original_text, OriginalText::NewSection);
        assert_eq!(results[0].strategy, ResolutionStrategy::ChunkHeader);
        assert_eq!(results[0].new_text, "### Milestone 3\nShip it.");
    }
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn existing_milestone_header_falls_through_to_target() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = block("Roadmap", "Extend", "### milestone 1\nPrototype v2.");

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results[0].section_title, "Roadmap");
    assert_eq!(results[0].strategy, ResolutionStrategy::Structural);
    assert_eq!(
        results[0].original_text,
        OriginalText::Existing("## Roadmap".to_string())
    );
}

#[tokio::test]
async fn path_suffix_resolves_to_existing_section() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = block(
        "Context, Aim & Integration: Integration",
        "Mention webhooks",
        "Also receives webhooks.",
    );

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].section_title, "Integration");
    assert_eq!(
        results[0].original_text,
        OriginalText::Existing("### Integration\nTalks to the billing API.".to_string())
    );
    assert_eq!(results[0].summary, "Mention webhooks");
}

#[tokio::test]
async fn features_body_splits_into_two_results() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = block(
        "Features",
        "Add features",
        "### Feature A\nDescription A.\n\n### Feature B\nDescription B.",
    );

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results.len(), 2);
    assert!(results[0].new_text.starts_with("### Feature A"));
    assert!(results[1].new_text.starts_with("### Feature B"));
    assert_eq!(results[1].section_title, "Feature B");
}

#[tokio::test]
async fn explicit_new_feature_stays_new_for_every_chunk() {
    let embedder = Arc::new(NoEmbeddings::default());
    let pipeline = pipeline_with(embedder.clone());
    let batch = block(
        "Feature: World Engine",
        "Describe the world engine",
        "#### Context...\nWhy.\n\n#### Technical Requirements\nHow.\n\n#### Constraints\nLimits.",
    );

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(result.section_title.contains("World Engine"));
        assert_eq!(result.original_text, OriginalText::NewSection);
        assert_eq!(result.strategy, ResolutionStrategy::ExplicitNew);
    }
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_embedding_degrades_to_unmatched() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = format!(
        "{}\n{}",
        block("Performance", "Be fast", "Make it faster."),
        block("Performance", "Cache", "## Caching\nUse an LRU.")
    );

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].section_title, "Performance");
    assert_eq!(results[0].original_text, OriginalText::Unmatched);
    assert_eq!(results[0].strategy, ResolutionStrategy::Unmatched);
    assert_eq!(results[1].section_title, "Caching");
    assert_eq!(results[1].original_text, OriginalText::Unmatched);
}

#[tokio::test]
async fn semantic_fallback_uses_nearest_section() {
    let pipeline = pipeline_with(Arc::new(Keywords));
    let batch = block("Money", "Rebalance", "More gold, less trade friction.");

    let results = resolve(&pipeline, &batch).await;
    assert_eq!(results[0].section_title, "Economy");
    assert_eq!(results[0].strategy, ResolutionStrategy::Semantic);
    assert_eq!(
        results[0].original_text,
        OriginalText::Existing("## Economy\nGold and trade between towns.".to_string())
    );
}

#[tokio::test]
async fn duplicate_titles_follow_the_target_path() {
    let documents = Arc::new(MemoryDocumentStore::with_document(
        "spec",
        "# Frontend\n## Integration\nWidgets.\n# Backend\n## Integration\nQueues.",
    ));
    let index = Arc::new(EmbeddingIndex::new(
        documents.clone(),
        Arc::new(NoEmbeddings::default()),
    ));
    let pipeline = UpdatePipeline::new(documents, index);

    let batch = format!(
        "{}\n{}\n{}",
        block("Frontend: Integration", "a", "x"),
        block("Backend -> Integration", "b", "y"),
        block("Integration", "c", "z")
    );
    let originals: Vec<_> = resolve(&pipeline, &batch)
        .await
        .into_iter()
        .map(|r| r.original_text)
        .collect();
    assert_eq!(
        originals,
        vec![
            OriginalText::Existing("## Integration\nWidgets.".to_string()),
            OriginalText::Existing("## Integration\nQueues.".to_string()),
            OriginalText::Existing("## Integration\nQueues.".to_string()),
        ]
    );
}

#[tokio::test]
async fn missing_protocol_is_not_an_empty_success() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));

    let err = pipeline
        .resolve_batch("spec", "just some prose")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoProtocol));

    let response = pipeline.process("spec", "just some prose").await.unwrap();
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "status": "error",
            "message": "Protocol not found or invalid format."
        })
    );
}

#[tokio::test]
async fn success_envelope_renders_sentinels() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = block("Roadmap", "Add milestone", "### Milestone 2\nBeta.");

    let response = pipeline.process("spec", &batch).await.unwrap();
    assert!(response.is_success());
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["matches"][0]["section_title"], "Milestone 2");
    assert_eq!(json["matches"][0]["original_text"], "(New Section)");
    assert_eq!(json["matches"][0]["new_text"], "### Milestone 2\nBeta.");
}

#[tokio::test]
async fn store_failure_is_an_error() {
    let documents: Arc<dyn DocumentStore> = Arc::new(BrokenStore);
    let index = Arc::new(EmbeddingIndex::new(
        documents.clone(),
        Arc::new(NoEmbeddings::default()),
    ));
    let pipeline = UpdatePipeline::new(documents, index);

    let batch = block("Aim", "x", "y");
    assert!(matches!(
        pipeline.resolve_batch("spec", &batch).await,
        Err(ResolveError::DocumentError(_))
    ));
    assert!(pipeline.process("spec", &batch).await.is_err());
}

#[tokio::test]
async fn missing_document_resolves_everything_as_new() {
    let pipeline = pipeline_with(Arc::new(NoEmbeddings::default()));
    let batch = block("Aim", "x", "## Aim\nGoal.");
    let results = pipeline.resolve_batch("unknown", &batch).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].original_text, OriginalText::Unmatched);
    assert_eq!(results[0].section_title, "Aim");
}

fn body_strategy() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "#{1,4} [A-Za-z][A-Za-z ]{0,12}",
        "[A-Za-z][A-Za-z .]{0,20}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 1..12)
        .prop_map(|lines| lines.join("\n"))
        .prop_filter("body must have text", |body| !body.trim().is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_chunk_gets_exactly_one_result(
        bodies in prop::collection::vec(body_strategy(), 1..4),
        target in "[A-Za-z][A-Za-z ]{0,15}",
    ) {
        let batch: String = bodies
            .iter()
            .map(|body| block(&target, "Change", body))
            .collect::<Vec<_>>()
            .join("\n\n");
        let expected: usize = parse_batch(&batch)
            .unwrap()
            .iter()
            .map(|intent| HierarchicalChunker::split(&intent.raw_body).len())
            .sum();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let results = runtime.block_on(async {
            pipeline_with(Arc::new(NoEmbeddings::default()))
                .resolve_batch("spec", &batch)
                .await
                .unwrap()
        });
        prop_assert_eq!(results.len(), expected);
    }
}

#[tokio::test]
async fn process_envelope_is_serializable_for_each_variant() {
    let response = ProcessResponse::Success { matches: vec![] };
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"status":"success","matches":[]}"#);
}
