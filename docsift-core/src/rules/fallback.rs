use crate::config::FallbackConfig;
use crate::normalize::{is_all_caps, normalize_key};
use crate::rules::font_statistics::FontStatistics;
use crate::types::{HeadingLevel, OutlineEntry, Span};
use std::collections::HashSet;

/// Best-effort outline for documents where no heading was accepted.
///
/// Multi-word lines on the first pages become H1; single large words H2.
pub fn fallback_outline(spans: &[Span], stats: &FontStatistics, config: &FallbackConfig) -> Vec<OutlineEntry> {
    let mut used = HashSet::new();
    let mut outline = Vec::new();

    for span in spans
        .iter()
        .filter(|s| s.page_number <= config.max_page && s.char_len() > config.span_min_chars)
    {
        let text = span.text.trim();
        let key = normalize_key(text);

        if text.chars().count() < config.text_min_chars
            || used.contains(&key)
            || text.chars().all(|c| c.is_ascii_digit())
            || config.generic_phrases.iter().any(|p| p.to_lowercase() == key)
        {
            continue;
        }

        let words = text.split_whitespace().count();
        if text.chars().any(|c| c.is_ascii_digit()) && words < config.digit_min_words {
            continue;
        }

        let level = if words >= 2 && !is_all_caps(text) {
            HeadingLevel::H1
        } else if words == 1 && span.font_size > stats.body_size * config.single_word_size_ratio {
            HeadingLevel::H2
        } else {
            continue;
        };

        outline.push(OutlineEntry {
            level,
            text: text.to_string(),
            page: span.page_number,
        });
        used.insert(key);
    }

    outline
}
