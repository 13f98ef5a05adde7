use crate::error::{ProtocolError, Result};
use crate::types::UpdateIntent;
use once_cell::sync::Lazy;
use regex::Regex;

pub const START_MARKER: &str = "<<<SPEC_START>>>";
pub const END_MARKER: &str = "<<<SPEC_END>>>";

// Label lines may carry a `*` or `-` bullet. The body runs up to the end marker.
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<<<SPEC_START>>>\s+(?:[*-]\s*)?Target-Section:\s*(.*?)\n\s*(?:[*-]\s*)?Change-Summary:\s*(.*?)\n\s*(.*?)<<<SPEC_END>>>",
    )
    .expect("protocol block pattern is valid")
});

/// Extract every protocol block from `text`, in order of appearance.
///
/// Returns [`ProtocolError::NotFound`] when the text holds no complete block, so callers can
/// tell "no protocol" apart from a batch that legitimately produced nothing.
pub fn parse_batch(text: &str) -> Result<Vec<UpdateIntent>> {
    let intents: Vec<UpdateIntent> = BLOCK_RE
        .captures_iter(text)
        .map(|caps| {
            let field = |idx: usize| caps.get(idx).map_or("", |m| m.as_str()).trim();
            UpdateIntent::new(field(1), field(2), field(3))
        })
        .collect();

    if intents.is_empty() {
        log::warn!("No protocol blocks found in {} chars of input", text.len());
        return Err(ProtocolError::NotFound);
    }

    log::info!("Found {} protocol blocks", intents.len());
    Ok(intents)
}

/// Render an intent in the canonical wire form.
#[must_use]
pub fn render_block(intent: &UpdateIntent) -> String {
    format!(
        "{START_MARKER}\nTarget-Section: {}\nChange-Summary: {}\n\n{}\n{END_MARKER}",
        intent.target_path, intent.change_summary, intent.raw_body
    )
}
