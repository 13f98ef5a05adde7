use specforge_document::{DocumentStore, Result, Section};

/// One section of the live document, with the titles that enclose it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub title: String,
    pub level: usize,
    pub content: String,
    /// Enclosing section titles, outermost first
    pub ancestors: Vec<String>,
}

/// Read-only view of a document's sections for one resolution pass.
///
/// Titles are case-sensitive keys; the resolver compares them case-insensitively. Every
/// occurrence of a duplicated title is kept together with its position in the heading tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    doc_id: String,
    entries: Vec<SnapshotEntry>,
    titles: Vec<String>,
}

impl DocumentSnapshot {
    pub fn from_sections(doc_id: impl Into<String>, sections: Vec<Section>) -> Self {
        let mut entries = Vec::with_capacity(sections.len());
        let mut titles: Vec<String> = Vec::new();
        let mut open: Vec<(usize, String)> = Vec::new();

        for section in sections {
            let mut ancestors = Vec::new();
            if section.level > 0 {
                while open.last().is_some_and(|(level, _)| *level >= section.level) {
                    open.pop();
                }
                ancestors = open.iter().map(|(_, title)| title.clone()).collect();
                open.push((section.level, section.title.clone()));
            }
            if !titles.contains(&section.title) {
                titles.push(section.title.clone());
            }
            entries.push(SnapshotEntry {
                title: section.title,
                level: section.level,
                content: section.content,
                ancestors,
            });
        }

        Self {
            doc_id: doc_id.into(),
            entries,
            titles,
        }
    }

    /// Take a snapshot of `doc_id` as the store currently has it
    pub async fn capture(store: &dyn DocumentStore, doc_id: &str) -> Result<Self> {
        let sections = store.get_structure(doc_id).await?;
        log::debug!("Snapshot of '{doc_id}': {} sections", sections.len());
        Ok(Self::from_sections(doc_id, sections))
    }

    #[must_use]
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Distinct titles in first-occurrence order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    #[must_use]
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_title_ignore_case(&self, title: &str) -> bool {
        let wanted = title.to_lowercase();
        self.titles.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Content of the section keyed exactly by `title`.
    ///
    /// When the title occurs more than once, the occurrence whose nearest enclosing section is
    /// named in `path_hint` (`"Parent: Child"` or `"Parent -> Child"`) wins; without such a
    /// hint the last occurrence wins.
    #[must_use]
    pub fn content_for(&self, title: &str, path_hint: &str) -> Option<&str> {
        let candidates: Vec<&SnapshotEntry> =
            self.entries.iter().filter(|e| e.title == title).collect();
        let last = candidates.last().copied();
        if candidates.len() < 2 {
            return last.map(|e| e.content.as_str());
        }

        let segments = enclosing_segments(path_hint);
        let mut best: Option<(usize, &SnapshotEntry)> = None;
        for entry in candidates {
            let distance = entry
                .ancestors
                .iter()
                .rev()
                .position(|ancestor| segments.contains(&ancestor.to_lowercase()));
            if let Some(distance) = distance {
                if best.map_or(true, |(top, _)| distance <= top) {
                    best = Some((distance, entry));
                }
            }
        }

        if best.is_none() {
            log::debug!("Title '{title}' is ambiguous; using its last occurrence");
        }
        best.map(|(_, e)| e).or(last).map(|e| e.content.as_str())
    }
}

/// Lowercased path segments of `hint` except the leaf
fn enclosing_segments(hint: &str) -> Vec<String> {
    let mut segments: Vec<String> = hint
        .replace("->", ":")
        .split(':')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    segments.pop();
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use specforge_document::parse_structure;

    const DUPLICATED: &str = "Intro\n# Frontend\n## Integration\nFrontend integration.\n\
                              # Backend\n## Integration\nBackend integration.\n### Notes\nn";

    fn snapshot(document: &str) -> DocumentSnapshot {
        DocumentSnapshot::from_sections("spec", parse_structure(document))
    }

    #[test]
    fn test_ancestors_follow_heading_tree() {
        let snap = snapshot(DUPLICATED);
        let ancestors: Vec<(&str, Vec<String>)> = snap
            .entries()
            .iter()
            .map(|e| (e.title.as_str(), e.ancestors.clone()))
            .collect();
        assert_eq!(
            ancestors,
            vec![
                ("Introduction", vec![]),
                ("Frontend", vec![]),
                ("Integration", vec!["Frontend".to_string()]),
                ("Backend", vec![]),
                ("Integration", vec!["Backend".to_string()]),
                (
                    "Notes",
                    vec!["Backend".to_string(), "Integration".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn test_titles_are_distinct_in_first_occurrence_order() {
        let snap = snapshot(DUPLICATED);
        let titles: Vec<&str> = snap.titles().collect();
        assert_eq!(
            titles,
            vec!["Introduction", "Frontend", "Integration", "Backend", "Notes"]
        );
        assert!(snap.contains_title_ignore_case("INTEGRATION"));
        assert!(!snap.contains_title_ignore_case("Integrations"));
    }

    #[test]
    fn test_duplicate_titles_use_enclosing_path() {
        let snap = snapshot(DUPLICATED);
        assert_eq!(
            snap.content_for("Integration", "Frontend: Integration"),
            Some("## Integration\nFrontend integration.")
        );
        assert_eq!(
            snap.content_for("Integration", "Spec -> backend -> Integration"),
            Some("## Integration\nBackend integration.")
        );
    }

    #[test]
    fn test_duplicate_titles_default_to_last_occurrence() {
        let snap = snapshot(DUPLICATED);
        let last = Some("## Integration\nBackend integration.");
        assert_eq!(snap.content_for("Integration", "Integration"), last);
        assert_eq!(snap.content_for("Integration", "Elsewhere: Integration"), last);
    }

    #[test]
    fn test_unknown_title() {
        assert_eq!(snapshot(DUPLICATED).content_for("Missing", "Missing"), None);
        assert!(snapshot("").is_empty());
    }

    #[test]
    fn test_enclosing_segments() {
        assert_eq!(enclosing_segments("A: B -> C"), vec!["a", "b"]);
        assert!(enclosing_segments("Leaf").is_empty());
    }
}
