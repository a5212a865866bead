use crate::config::SegmentationConfig;
use crate::normalize::collapse_whitespace;
use crate::types::{Section, Span};

/// Splits a document's span stream into sections at heading-like spans
pub struct SectionSegmenter<'a> {
    config: &'a SegmentationConfig,
}

impl<'a> SectionSegmenter<'a> {
    pub fn new(config: &'a SegmentationConfig) -> Self {
        Self { config }
    }

    /// A span opens a section when it is large and short, or bold
    pub fn is_boundary(&self, span: &Span) -> bool {
        let text = span.text.trim();
        (span.font_size > self.config.size_threshold && text.chars().count() < self.config.max_title_chars)
            || span.is_bold
    }

    pub fn segment(&self, spans: &[Span], document: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<Section> = None;

        for span in spans {
            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }

            if self.is_boundary(span) {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                current = Some(Section {
                    title: text.to_string(),
                    text: String::new(),
                    page_number: span.page_number,
                    document: document.to_string(),
                });
            } else if let Some(section) = current.as_mut() {
                section.text.push(' ');
                section.text.push_str(text);
            } else {
                current = Some(Section {
                    title: self.config.implicit_title.clone(),
                    text: text.to_string(),
                    page_number: span.page_number,
                    document: document.to_string(),
                });
            }
        }
        sections.extend(current);

        for section in &mut sections {
            section.text = collapse_whitespace(&section.text);
        }

        tracing::debug!("✂️  {document}: {} section(s)", sections.len());
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn span(text: &str, size: f32, page: u32) -> Span {
        Span::new(text, size, page, BoundingBox::new(50.0, 100.0, 300.0, 100.0 + size))
    }

    fn segment(spans: &[Span]) -> Vec<Section> {
        let config = SegmentationConfig::default();
        SectionSegmenter::new(&config).segment(spans, "guide.pdf")
    }

    #[test]
    fn leading_body_opens_introduction() {
        let spans = vec![
            span("Welcome to the region.", 10.0, 1),
            span("Beaches", 16.0, 1),
            span("Sand   and sun.", 10.0, 2),
            span("More sand.", 10.0, 2),
        ];
        let sections = segment(&spans);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].text, "Welcome to the region.");
        assert_eq!(sections[1].title, "Beaches");
        assert_eq!(sections[1].text, "Sand and sun. More sand.");
        // Page comes from the opening span
        assert_eq!(sections[1].page_number, 1);
        assert_eq!(sections[1].document, "guide.pdf");
    }

    #[test]
    fn bold_body_size_span_is_a_boundary() {
        let spans = vec![
            span("Nightlife", 10.0, 3).bold(),
            span("Clubs open late.", 10.0, 3),
        ];
        let sections = segment(&spans);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Nightlife");
        assert_eq!(sections[0].page_number, 3);
    }

    #[test]
    fn long_large_text_is_not_a_boundary() {
        let long = "word ".repeat(30);
        let spans = vec![span("Markets", 14.0, 1), span(&long, 14.0, 1)];
        let sections = segment(&spans);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].text.starts_with("word word"));
    }

    #[test]
    fn size_threshold_is_strict() {
        let config = SegmentationConfig::default();
        let segmenter = SectionSegmenter::new(&config);
        assert!(!segmenter.is_boundary(&span("Exactly twelve", 12.0, 1)));
        assert!(segmenter.is_boundary(&span("Just above", 12.5, 1)));
    }

    #[test]
    fn consecutive_headings_yield_empty_sections() {
        let spans = vec![span("Part One", 18.0, 1), span("Part Two", 18.0, 1)];
        let sections = segment(&spans);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].text.is_empty());
    }

    #[test]
    fn empty_input_has_no_sections() {
        assert!(segment(&[]).is_empty());
    }
}
