use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+)\s").expect("heading pattern is valid"));

/// A Markdown ATX heading: `#` × level, whitespace, title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub title: String,
}

/// Parse `line` as a heading. The `#` run must start the line and be followed by whitespace,
/// so `#hashtag` is body text.
#[must_use]
pub fn parse_heading(line: &str) -> Option<Heading> {
    let caps = HEADING_RE.captures(line)?;
    let hashes = caps.get(1)?;
    Some(Heading {
        level: hashes.as_str().len(),
        title: line[hashes.end()..].trim().to_string(),
    })
}

/// Loose heading used when indexing a document: any line starting with `#`.
pub(crate) fn loose_heading(line: &str) -> Option<Heading> {
    if !line.starts_with('#') {
        return None;
    }
    let title = line.trim_start_matches('#');
    Some(Heading {
        level: line.len() - title.len(),
        title: title.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_and_titles() {
        let h = parse_heading("### Milestone 3  ").unwrap();
        assert_eq!(h.level, 3);
        assert_eq!(h.title, "Milestone 3");

        let h = parse_heading("#\tTabbed").unwrap();
        assert_eq!(h.level, 1);
        assert_eq!(h.title, "Tabbed");
    }

    #[test]
    fn requires_whitespace_after_hashes() {
        assert!(parse_heading("#hashtag").is_none());
        assert!(parse_heading("plain text").is_none());
        assert!(parse_heading("  ## indented").is_none());
        assert!(parse_heading("###").is_none());
    }

    #[test]
    fn loose_heading_accepts_any_hash_line() {
        let h = loose_heading("##Compact").unwrap();
        assert_eq!(h.level, 2);
        assert_eq!(h.title, "Compact");
        assert!(loose_heading(" # not at start").is_none());
    }
}
