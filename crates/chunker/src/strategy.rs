use crate::heading::{loose_heading, parse_heading};
use crate::types::Chunk;

/// Splits a change body along header boundaries while keeping sub-headers with their parent.
///
/// `### A`, `#### a1`, `### B` yields two chunks: `[### A, #### a1]` and `[### B]`.
/// Text before the first header is its own chunk.
pub struct HierarchicalChunker;

impl HierarchicalChunker {
    #[must_use]
    pub fn split(body: &str) -> Vec<Chunk> {
        if body.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        // None while the buffer holds introductory text only
        let mut current_level: Option<usize> = None;

        for line in body.split('\n') {
            let Some(heading) = parse_heading(line) else {
                current.push(line.to_string());
                continue;
            };

            let starts_new_unit =
                !current.is_empty() && current_level.map_or(true, |level| heading.level <= level);

            if starts_new_unit {
                chunks.push(Chunk::from_lines(std::mem::take(&mut current)));
                current.push(line.to_string());
                current_level = Some(heading.level);
            } else {
                current.push(line.to_string());
                if current_level.is_none() {
                    current_level = Some(heading.level);
                }
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk::from_lines(current));
        }

        if chunks.is_empty() {
            chunks.push(Chunk::from_lines(vec![body.to_string()]));
        }

        chunks
    }
}

/// Splits a whole document into one chunk per header line, whatever its depth.
///
/// Every produced chunk carries a header title: the heading text, or the configured
/// introduction title for text preceding the first heading (with no level).
pub struct SectionSplitter {
    introduction_title: String,
}

impl SectionSplitter {
    pub fn new(introduction_title: impl Into<String>) -> Self {
        Self {
            introduction_title: introduction_title.into(),
        }
    }

    #[must_use]
    pub fn split(&self, document: &str) -> Vec<Chunk> {
        if document.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut header = self.introduction_title.clone();
        let mut level: Option<usize> = None;

        for line in document.split('\n') {
            if let Some(heading) = loose_heading(line) {
                if !current.is_empty() {
                    chunks.push(Chunk::with_header(
                        std::mem::take(&mut current),
                        Some(std::mem::replace(&mut header, heading.title)),
                        level,
                    ));
                } else {
                    header = heading.title;
                }
                level = Some(heading.level);
            }
            current.push(line.to_string());
        }

        if !current.is_empty() {
            chunks.push(Chunk::with_header(current, Some(header), level));
        }

        chunks
    }
}
