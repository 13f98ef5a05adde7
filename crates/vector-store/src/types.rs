use serde::{Deserialize, Serialize};

/// One addressable section of a document and its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub header: String,
    pub text: String,
    /// Empty when the provider could not embed this section
    pub vector: Vec<f32>,
}

/// Nearest section for a probe
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub header: String,
    pub text: String,
    pub score: f32,
}
