use crate::snapshot::DocumentSnapshot;
use specforge_chunker::Chunk;
use specforge_protocol::{OriginalText, ResolutionResult, ResolutionStrategy, UpdateIntent};
use specforge_vector_store::EmbeddingIndex;
use std::sync::Arc;

/// Header prefixes that mark a chunk as a self-contained new unit
const NEW_UNIT_PREFIXES: [&str; 2] = ["milestone", "feature"];

/// Target prefixes that explicitly ask for a new section
const EXPLICIT_NEW_PREFIXES: [&str; 4] = ["feature:", "milestone:", "feature ", "milestone "];

/// Decides which section of the live document each chunk of a proposed change belongs to.
///
/// Tiers, first match wins:
/// 1. the chunk declares a new `Milestone…`/`Feature…` header
/// 2. the target names an existing title, exactly or as the last segment of a path
/// 3. the target explicitly asks for a new feature or milestone
/// 4. nearest section in the embedding index, or an unmatched new section
pub struct SectionResolver {
    index: Arc<EmbeddingIndex>,
}

impl SectionResolver {
    pub fn new(index: Arc<EmbeddingIndex>) -> Self {
        Self { index }
    }

    #[must_use]
    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Resolve one chunk of `intent` against `snapshot`.
    ///
    /// Returns `None` only for malformed input: a blank chunk, or an intent with neither target
    /// nor summary. Every other input yields a result, degrading to a new section.
    pub async fn resolve_chunk(
        &self,
        intent: &UpdateIntent,
        chunk: &Chunk,
        snapshot: &DocumentSnapshot,
    ) -> Option<ResolutionResult> {
        if chunk.is_blank() {
            log::debug!("Skipping blank chunk of '{}'", intent.target_path);
            return None;
        }
        if intent.target_path.is_empty() && intent.change_summary.is_empty() {
            log::debug!("Skipping chunk of an intent with no target and no summary");
            return None;
        }

        let target = intent.target_path.as_str();
        let declared = chunk.declared_title();
        let resolved = |title: &str, original_text, strategy| ResolutionResult {
            section_title: title.to_string(),
            original_text,
            new_text: chunk.text(),
            summary: intent.change_summary.clone(),
            strategy,
        };

        if let Some(title) = declared
            .as_deref()
            .filter(|title| declares_new_unit(title, snapshot))
        {
            log::info!("    -> Chunk defines new header '{title}'. Forcing new section.");
            return Some(resolved(
                title,
                OriginalText::NewSection,
                ResolutionStrategy::ChunkHeader,
            ));
        }

        if let Some(title) = structural_match(target, snapshot) {
            log::info!("    -> Structure match: intent '{target}' matched section '{title}'");
            let content = snapshot.content_for(title, target).unwrap_or_default();
            return Some(resolved(
                title,
                OriginalText::Existing(content.to_string()),
                ResolutionStrategy::Structural,
            ));
        }

        if is_explicit_new(target) {
            log::info!("    -> Explicit new section intent '{target}'. Skipping semantic search.");
            return Some(resolved(
                target,
                OriginalText::NewSection,
                ResolutionStrategy::ExplicitNew,
            ));
        }

        let probe = format!("{target}\n{}", chunk.text());
        match self.index.query(snapshot.doc_id(), &probe).await {
            Some(hit) => {
                log::info!(
                    "    -> Semantic match: '{}' (score {:.3})",
                    hit.header,
                    hit.score
                );
                Some(resolved(
                    hit.header.as_str(),
                    OriginalText::Existing(hit.text),
                    ResolutionStrategy::Semantic,
                ))
            }
            None => {
                let title = declared.as_deref().unwrap_or(target);
                log::info!("    -> No semantic match for chunk using '{target}'. Added as new.");
                Some(resolved(
                    title,
                    OriginalText::Unmatched,
                    ResolutionStrategy::Unmatched,
                ))
            }
        }
    }
}

fn declares_new_unit(title: &str, snapshot: &DocumentSnapshot) -> bool {
    let lower = title.to_lowercase();
    NEW_UNIT_PREFIXES.iter().any(|p| lower.starts_with(p))
        && !snapshot.contains_title_ignore_case(title)
}

/// Existing title named by `target`: an exact (case-insensitive) hit ends the scan, a
/// `": title"` / `"-> title"` suffix hit is kept while later titles are still checked.
fn structural_match<'a>(target: &str, snapshot: &'a DocumentSnapshot) -> Option<&'a str> {
    let intent = target.to_lowercase();
    let mut retained = None;
    for title in snapshot.titles() {
        let normalized = title.to_lowercase();
        if intent == normalized {
            return Some(title);
        }
        if intent.ends_with(&format!(": {normalized}"))
            || intent.ends_with(&format!("-> {normalized}"))
        {
            retained = Some(title);
        }
    }
    retained
}

fn is_explicit_new(target: &str) -> bool {
    let lower = target.to_lowercase();
    EXPLICIT_NEW_PREFIXES.iter().any(|p| lower.starts_with(p))
}
