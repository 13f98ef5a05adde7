use serde::{Deserialize, Serialize};

/// Title of the level-0 section holding text before the first heading
pub const INTRODUCTION_TITLE: &str = "Introduction";

/// One heading of a document together with the text that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    /// Number of `#` in the heading; 0 for the introduction
    pub level: usize,

    /// Heading line plus every line up to the next heading
    pub content: String,
}

/// Flatten a Markdown document into its sections, in document order.
///
/// A line is a heading when it starts with `#` after trimming. Content runs up to the next
/// heading of any level, so a parent section's content excludes its children.
#[must_use]
pub fn parse_structure(document: &str) -> Vec<Section> {
    if document.is_empty() {
        return Vec::new();
    }

    let mut sections = Vec::new();
    let mut title = INTRODUCTION_TITLE.to_string();
    let mut level = 0;
    let mut content: Vec<&str> = Vec::new();

    for line in document.split('\n') {
        let stripped = line.trim();
        if stripped.starts_with('#') {
            if !content.is_empty() {
                sections.push(Section {
                    title: std::mem::take(&mut title),
                    level,
                    content: content.join("\n"),
                });
                content.clear();
            }
            let text = stripped.trim_start_matches('#');
            level = stripped.len() - text.len();
            title = text.trim().to_string();
        }
        content.push(line);
    }

    if !content.is_empty() {
        sections.push(Section {
            title,
            level,
            content: content.join("\n"),
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings_carry_their_own_content() {
        let sections = parse_structure("# Title\n\n## Aim\nBuild it.\n### Detail\nx");
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Title", "Aim", "Detail"]);
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].content, "## Aim\nBuild it.");
        assert_eq!(sections[0].content, "# Title\n");
    }

    #[test]
    fn leading_text_becomes_introduction() {
        let sections = parse_structure("Preface line\n# Title");
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].level, 0);
        assert_eq!(sections[0].content, "Preface line");
    }

    #[test]
    fn indented_heading_still_counts() {
        let sections = parse_structure("  ## Indented\nbody");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Indented");
        assert_eq!(sections[0].level, 2);
        assert_eq!(sections[0].content, "  ## Indented\nbody");
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(parse_structure("").is_empty());
    }
}
