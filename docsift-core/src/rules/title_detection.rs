use crate::config::TitleConfig;
use crate::normalize::{clean_title, is_numeric_text, normalize_key};
use crate::rules::font_statistics::FontStatistics;
use crate::types::Span;
use std::collections::HashSet;

/// Groups large lines near the top of page 1 into a single document title
pub struct TitleExtractor<'a> {
    config: &'a TitleConfig,
}

impl<'a> TitleExtractor<'a> {
    pub fn new(config: &'a TitleConfig) -> Self {
        Self { config }
    }

    /// Extract the title from a document's spans. Only page 1 is inspected.
    pub fn extract(&self, spans: &[Span], stats: &FontStatistics) -> String {
        let first_page: Vec<&Span> = spans.iter().filter(|s| s.page_number == 1).collect();

        let Some(max_size) = first_page
            .iter()
            .filter(|s| s.char_len() > self.config.max_size_min_chars)
            .map(|s| s.font_size)
            .reduce(f32::max)
        else {
            tracing::debug!("📰 No usable first-page spans, title is untitled");
            return self.config.untitled.clone();
        };

        let page_height = stats
            .page_size
            .map(|p| p.height)
            .or_else(|| first_page.iter().map(|s| s.bottom()).reduce(f32::max))
            .unwrap_or_else(|| stats.page_height());
        let top_cutoff = self.config.top_fraction * page_height;
        let size_threshold = self.config.size_fraction * max_size;

        let mut seen = HashSet::new();
        let mut candidates: Vec<&Span> = first_page
            .iter()
            .copied()
            .filter(|s| {
                s.font_size >= size_threshold
                    && s.char_len() > self.config.candidate_min_chars
                    && s.top() < top_cutoff
                    && self.is_good_title_line(&s.text)
            })
            .filter(|s| seen.insert(normalize_key(&s.text)))
            .collect();
        candidates.sort_by(|a, b| a.top().total_cmp(&b.top()));

        let group = self.group_leading_lines(&candidates);
        if !group.is_empty() {
            let title = group
                .iter()
                .map(|s| clean_title(&s.text))
                .collect::<Vec<_>>()
                .join(" ");
            tracing::debug!("📰 Title from {} grouped line(s): {title}", group.len());
            return title;
        }

        // Largest text closest to the top of the page
        first_page
            .iter()
            .filter(|s| s.char_len() > self.config.max_size_min_chars && s.font_size == max_size)
            .min_by(|a, b| a.top().total_cmp(&b.top()))
            .map(|s| clean_title(&s.text))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.config.untitled.clone())
    }

    /// Consecutive candidates whose top-y gap stays below the limit; stops at
    /// the first larger gap.
    fn group_leading_lines<'s>(&self, candidates: &[&'s Span]) -> Vec<&'s Span> {
        let mut group: Vec<&Span> = Vec::new();
        for &candidate in candidates {
            if let Some(previous) = group.last() {
                if candidate.top() - previous.top() >= self.config.max_line_gap {
                    break;
                }
            }
            group.push(candidate);
        }
        group
    }

    pub fn is_good_title_line(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < self.config.line_min_chars || is_numeric_text(text) {
            return false;
        }
        let lowered = text.to_lowercase();
        if self.config.generic_phrases.iter().any(|p| p.to_lowercase() == lowered) {
            return false;
        }
        text.chars().next().is_some_and(char::is_uppercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, PageSize};

    fn line(text: &str, size: f32, top: f32) -> Span {
        Span::new(text, size, 1, BoundingBox::new(100.0, top, 400.0, top + size))
    }

    fn letter_page() -> FontStatistics {
        FontStatistics::default().with_page_size(Some(PageSize {
            width: 612.0,
            height: 792.0,
        }))
    }

    fn extract(spans: &[Span], stats: &FontStatistics) -> String {
        let config = TitleConfig::default();
        TitleExtractor::new(&config).extract(spans, stats)
    }

    #[test]
    fn groups_close_lines() {
        let spans = vec![line("Annual", 20.0, 50.0), line("Report", 20.0, 60.0)];
        assert_eq!(extract(&spans, &letter_page()), "Annual Report");
    }

    #[test]
    fn stops_at_large_gap() {
        let spans = vec![
            line("Annual Report", 20.0, 50.0),
            line("Fiscal Year", 20.0, 80.0),
            line("Prepared Separately", 20.0, 120.0),
        ];
        assert_eq!(extract(&spans, &letter_page()), "Annual Report Fiscal Year");
    }

    #[test]
    fn ignores_small_and_low_lines() {
        let spans = vec![
            line("Body paragraph text", 10.0, 55.0),
            line("Project Charter", 24.0, 60.0),
            line("Appendix Heading", 24.0, 500.0),
            line("Later Text On Page", 10.0, 700.0),
        ];
        assert_eq!(extract(&spans, &letter_page()), "Project Charter");
    }

    #[test]
    fn deduplicates_repeated_lines() {
        let spans = vec![
            line("Project Charter", 24.0, 60.0),
            line("project charter ", 24.0, 70.0),
            line("Version Two", 24.0, 80.0),
        ];
        assert_eq!(extract(&spans, &letter_page()), "Project Charter Version Two");
    }

    #[test]
    fn strips_title_label() {
        let spans = vec![line("Title: Mission Plan", 22.0, 40.0)];
        assert_eq!(extract(&spans, &letter_page()), "Mission Plan");
    }

    #[test]
    fn falls_back_to_largest_top_span() {
        // Lowercase first letter fails the title-line predicate
        let spans = vec![
            line("lowercase banner text", 30.0, 100.0),
            line("another lowercase banner", 30.0, 40.0),
            line("Body paragraph text", 10.0, 150.0),
        ];
        assert_eq!(extract(&spans, &letter_page()), "another lowercase banner");
    }

    #[test]
    fn untitled_without_first_page_text() {
        let mut span = line("Only On Page Two", 20.0, 50.0);
        span.page_number = 2;
        assert_eq!(extract(&[span], &letter_page()), "Untitled Document");
        assert_eq!(extract(&[], &FontStatistics::default()), "Untitled Document");
    }

    #[test]
    fn page_height_from_observed_bottom() {
        // No page size known: height comes from the lowest span (y1 = 710)
        let spans = vec![
            line("Field Guide", 20.0, 200.0),
            line("Footer text line", 10.0, 700.0),
        ];
        assert_eq!(extract(&spans, &FontStatistics::default()), "Field Guide");
    }

    #[test]
    fn good_title_line_predicate() {
        let config = TitleConfig::default();
        let extractor = TitleExtractor::new(&config);
        assert!(extractor.is_good_title_line("Overview of Goals"));
        assert!(!extractor.is_good_title_line("Short"));
        assert!(!extractor.is_good_title_line("Table of Contents"));
        assert!(!extractor.is_good_title_line("lowercase start"));
        assert!(!extractor.is_good_title_line("123456"));
    }
}
