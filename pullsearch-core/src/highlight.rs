//! Splitting display text into plain and highlighted runs.

use regex::RegexBuilder;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

impl Segment {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
        }
    }
}

/// Splits `text` on every case-insensitive occurrence of `term`.
///
/// The term is matched literally. A blank term, or a term that cannot be
/// compiled, yields the whole text as one plain segment. Empty pieces are
/// dropped.
pub fn highlight(text: &str, term: &str) -> Vec<Segment> {
    if term.trim().is_empty() {
        return vec![Segment::plain(text)];
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            debug!("Highlighting disabled for {:?}: {}", term, e);
            return vec![Segment::plain(text)];
        }
    };

    let needle = term.to_lowercase();
    let classify = |piece: &str| Segment {
        text: piece.to_string(),
        is_match: piece.to_lowercase() == needle,
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for found in pattern.find_iter(text) {
        segments.push(classify(&text[last..found.start()]));
        segments.push(classify(found.as_str()));
        last = found.end();
    }
    segments.push(classify(&text[last..]));
    segments.retain(|segment| !segment.text.is_empty());

    if segments.is_empty() {
        return vec![Segment::plain(text)];
    }
    segments
}

pub fn match_count(segments: &[Segment]) -> usize {
    segments.iter().filter(|segment| segment.is_match).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_blank_term_returns_text_unchanged() {
        for term in ["", "   ", "\t\n"] {
            let segments = highlight("Hello World", term);
            assert_eq!(segments, vec![Segment::plain("Hello World")]);
            assert_eq!(match_count(&segments), 0);
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let segments = highlight("Hello World", "world");
        assert_eq!(
            segments,
            vec![
                Segment::plain("Hello "),
                Segment {
                    text: "World".to_string(),
                    is_match: true
                },
            ]
        );
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let segments = highlight("a.b", ".");
        assert_eq!(match_count(&segments), 1);
        assert_eq!(segments[1].text, ".");
        assert!(!segments[0].is_match);
        assert!(!segments[2].is_match);

        let segments = highlight("abc", ".");
        assert_eq!(segments, vec![Segment::plain("abc")]);
    }

    #[test]
    fn test_unbalanced_pattern_input() {
        let text = "call f(x) or (y";
        let segments = highlight(text, "(");
        assert_eq!(match_count(&segments), 2);
        assert_eq!(joined(&segments), text);

        let segments = highlight("a+b [c] *d*", "[c]");
        assert_eq!(match_count(&segments), 1);
    }

    #[test]
    fn test_every_occurrence_marked() {
        let segments = highlight("Rust rust RUST", "rust");
        assert_eq!(match_count(&segments), 3);
        assert_eq!(joined(&segments), "Rust rust RUST");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(highlight("", "rust"), vec![Segment::plain("")]);
    }
}
