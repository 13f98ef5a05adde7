use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rendered in place of prior content when a section is known to be brand new.
pub const NEW_SECTION_SENTINEL: &str = "(New Section)";

/// Rendered in place of prior content when no section could be matched at all.
pub const UNMATCHED_SENTINEL: &str = "(No matching section found. Will be added as new.)";

/// Error message carried by the process envelope when no protocol block was found.
pub const NO_PROTOCOL_MESSAGE: &str = "Protocol not found or invalid format.";

/// One proposed change, as stated by a single protocol block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateIntent {
    /// Free-text hint naming the target section (`"Parent: Child"`, `"Parent -> Child"`, …)
    pub target_path: String,

    /// One-line description of the change
    pub change_summary: String,

    /// Markdown payload of the block
    pub raw_body: String,
}

impl UpdateIntent {
    pub fn new(
        target_path: impl Into<String>,
        change_summary: impl Into<String>,
        raw_body: impl Into<String>,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            change_summary: change_summary.into(),
            raw_body: raw_body.into(),
        }
    }

    /// An intent without a body cannot produce any chunk worth resolving.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.raw_body.trim().is_empty()
    }
}

/// What the downstream merge step diffs a chunk against.
///
/// Serialized as a plain string: real section content, or one of the two sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalText {
    /// Content of an existing section
    Existing(String),
    /// A structural decision was made that the target is a new section
    NewSection,
    /// Semantic search found nothing; the chunk will be appended as new
    Unmatched,
}

impl OriginalText {
    #[must_use]
    pub fn as_wire_str(&self) -> &str {
        match self {
            Self::Existing(text) => text,
            Self::NewSection => NEW_SECTION_SENTINEL,
            Self::Unmatched => UNMATCHED_SENTINEL,
        }
    }

    #[must_use]
    pub fn from_wire(raw: String) -> Self {
        match raw.as_str() {
            NEW_SECTION_SENTINEL => Self::NewSection,
            UNMATCHED_SENTINEL => Self::Unmatched,
            _ => Self::Existing(raw),
        }
    }

    /// True for both sentinel states: the merge step appends instead of diffing.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::NewSection | Self::Unmatched)
    }

    #[must_use]
    pub fn existing(&self) -> Option<&str> {
        match self {
            Self::Existing(text) => Some(text),
            Self::NewSection | Self::Unmatched => None,
        }
    }
}

impl Serialize for OriginalText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for OriginalText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_wire)
    }
}

/// Which tier of the resolver produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The chunk's own `Milestone…`/`Feature…` header names a section that does not exist yet
    ChunkHeader,
    /// Exact or path-suffix title match
    Structural,
    /// The target explicitly asks for a new feature or milestone
    ExplicitNew,
    /// Nearest neighbour in the embedding index
    Semantic,
    /// Nothing matched
    Unmatched,
}

impl ResolutionStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ChunkHeader => "chunk_header",
            Self::Structural => "structural",
            Self::ExplicitNew => "explicit_new",
            Self::Semantic => "semantic",
            Self::Unmatched => "unmatched",
        }
    }
}

/// Where one chunk goes, plus the before/after pair for the merge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolutionResult {
    pub section_title: String,

    #[schemars(with = "String")]
    pub original_text: OriginalText,

    pub new_text: String,

    pub summary: String,

    pub strategy: ResolutionStrategy,
}

/// Envelope returned for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessResponse {
    Success { matches: Vec<ResolutionResult> },
    Error { message: String },
}

impl ProcessResponse {
    #[must_use]
    pub fn no_protocol() -> Self {
        Self::Error {
            message: NO_PROTOCOL_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
