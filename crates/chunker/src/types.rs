use crate::heading::{loose_heading, parse_heading};
use serde::{Deserialize, Serialize};

/// A slice of Markdown that is resolved or indexed as one unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Lines of the chunk, in source order, without trailing newlines
    pub lines: Vec<String>,

    /// Title of the heading on the first line, if any
    pub header_title: Option<String>,

    /// Depth of the heading on the first line, if any
    pub header_level: Option<usize>,
}

impl Chunk {
    /// Create a chunk, deriving the header fields from its first line
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        let heading = lines
            .first()
            .and_then(|first| parse_heading(first.trim_start()));
        Self {
            header_title: heading.as_ref().map(|h| h.title.clone()),
            header_level: heading.map(|h| h.level),
            lines,
        }
    }

    /// Create a chunk with explicit header fields
    #[must_use]
    pub const fn with_header(
        lines: Vec<String>,
        header_title: Option<String>,
        header_level: Option<usize>,
    ) -> Self {
        Self {
            lines,
            header_title,
            header_level,
        }
    }

    /// The chunk's Markdown, lines joined with `\n`
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Title the chunk names for itself: its first line, trimmed, read as a loose heading.
    ///
    /// Unlike [`Chunk::header_title`] this accepts `#Title` without a space.
    #[must_use]
    pub fn declared_title(&self) -> Option<String> {
        self.header_title.clone().or_else(|| {
            self.first_line()
                .and_then(|first| loose_heading(first.trim()))
                .map(|heading| heading.title)
        })
    }

    /// True when no line carries any non-whitespace text
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}
