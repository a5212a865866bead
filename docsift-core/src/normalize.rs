// Text normalization applied before comparison or output.

use crate::types::Span;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s*$").unwrap());
static TITLE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(title|document):\s*").unwrap());

/// Collapse whitespace runs, trim, and blank out bare page numbers
pub fn clean_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if PAGE_NUMBER.is_match(&collapsed) {
        return String::new();
    }
    collapsed
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Clean a title candidate: whitespace plus a leading "title:" / "document:" label
pub fn clean_title(title: &str) -> String {
    let collapsed = collapse_whitespace(title);
    TITLE_LABEL.replace(&collapsed, "").trim().to_string()
}

/// Lowercased, trimmed key used for deduplication
pub fn normalize_key(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

/// Digits only, optionally with dots and spaces ("12", "3.4", "2 3")
pub fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c.is_whitespace())
}

/// At least one uppercase letter and no lowercase ones
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// New spans with cleaned text; spans that clean to nothing are dropped
pub fn normalize_spans(spans: &[Span]) -> Vec<Span> {
    spans
        .iter()
        .filter_map(|span| {
            let text = clean_text(&span.text);
            if text.is_empty() {
                None
            } else {
                Some(Span {
                    text,
                    ..span.clone()
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  Annual \t\n Report  "), "Annual Report");
    }

    #[test]
    fn drops_page_numbers() {
        assert_eq!(clean_text(" 12 "), "");
        assert_eq!(clean_text("12 Angry Men"), "12 Angry Men");
    }

    #[test]
    fn strips_title_labels() {
        assert_eq!(clean_title("Title:  Quarterly   Plan"), "Quarterly Plan");
        assert_eq!(clean_title("DOCUMENT: Terms"), "Terms");
        assert_eq!(clean_title("Entitled: Terms"), "Entitled: Terms");
    }

    #[test]
    fn numeric_and_caps_detection() {
        assert!(is_numeric_text("2024"));
        assert!(is_numeric_text("3.1.4"));
        assert!(!is_numeric_text("3.1 Scope"));
        assert!(!is_numeric_text("..."));
        assert!(is_all_caps("TABLE OF CONTENTS 2"));
        assert!(!is_all_caps("Table"));
        assert!(!is_all_caps("123"));
    }

    #[test]
    fn normalize_spans_keeps_metadata() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 32.0);
        let spans = vec![
            Span::new("  Hello   world ", 11.0, 2, bbox).bold(),
            Span::new(" 7 ", 9.0, 2, bbox),
        ];
        let normalized = normalize_spans(&spans);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].text, "Hello world");
        assert!(normalized[0].is_bold);
        assert_eq!(normalized[0].page_number, 2);
        // Originals untouched
        assert_eq!(spans[0].text, "  Hello   world ");
    }
}
