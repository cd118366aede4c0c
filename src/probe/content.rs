//! Decide whether a response body is worth keeping

use scraper::{Html, Node};

/// Elements whose text never shows up on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Verdict on a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVerdict {
    /// Enough visible text, not a parking page
    Meaningful { text_len: usize },
    /// Visible text shorter than the minimum
    TooShort { text_len: usize },
    /// Matches a parked-domain phrase
    Parked { phrase: String },
}

impl ContentVerdict {
    pub fn is_meaningful(&self) -> bool {
        matches!(self, ContentVerdict::Meaningful { .. })
    }

    pub fn text_len(&self) -> Option<usize> {
        match self {
            ContentVerdict::Meaningful { text_len } | ContentVerdict::TooShort { text_len } => {
                Some(*text_len)
            }
            ContentVerdict::Parked { .. } => None,
        }
    }
}

/// Visible text of an HTML document, whitespace collapsed to single spaces.
///
/// Plain-text bodies come through unchanged apart from whitespace.
pub fn visible_text(body: &str) -> String {
    let document = Html::parse_document(body);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Classify a body against the minimum text length and parked phrases
pub fn assess(body: &str, min_text_len: usize, parked_phrases: &[String]) -> ContentVerdict {
    let text = visible_text(body);
    let text_len = text.chars().count();

    if text_len == 0 || text_len < min_text_len {
        return ContentVerdict::TooShort { text_len };
    }

    let lower = text.to_lowercase();
    if let Some(phrase) = parked_phrases
        .iter()
        .find(|phrase| lower.contains(phrase.to_lowercase().as_str()))
    {
        return ContentVerdict::Parked {
            phrase: phrase.clone(),
        };
    }

    ContentVerdict::Meaningful { text_len }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PARKED_PHRASES;

    fn parked() -> Vec<String> {
        PARKED_PHRASES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_page_is_meaningful() {
        let verdict = assess("<html><body>hello</body></html>", 1, &parked());
        assert_eq!(verdict, ContentVerdict::Meaningful { text_len: 5 });
    }

    #[test]
    fn test_scripts_and_styles_are_not_content() {
        let body = r#"<html><head><title>Site</title><style>body{}</style></head>
            <body><script>var x = 1;</script>   </body></html>"#;
        assert_eq!(visible_text(body), "");
        assert!(!assess(body, 1, &parked()).is_meaningful());
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(assess("", 1, &parked()), ContentVerdict::TooShort { text_len: 0 });
        assert_eq!(assess("", 0, &parked()), ContentVerdict::TooShort { text_len: 0 });
    }

    #[test]
    fn test_minimum_length() {
        let body = "<p>hello   world</p>";
        assert_eq!(visible_text(body), "hello world");
        assert!(assess(body, 11, &parked()).is_meaningful());
        assert_eq!(assess(body, 12, &parked()), ContentVerdict::TooShort { text_len: 11 });
    }

    #[test]
    fn test_parked_page() {
        let body = "<html><body><h1>This Domain Is Parked</h1><p>Buy now</p></body></html>";
        let verdict = assess(body, 1, &parked());
        assert_eq!(
            verdict,
            ContentVerdict::Parked {
                phrase: "this domain is parked".to_string()
            }
        );
        assert_eq!(verdict.text_len(), None);
    }

    #[test]
    fn test_plain_text_body() {
        assert_eq!(visible_text("just text\n"), "just text");
    }
}
