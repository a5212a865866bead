use serde::{Deserialize, Serialize};
use std::fmt;

// ===== SPAN TYPES =====
// Spans are produced once by the parser collaborator (see preprocessors/)
// and never mutated afterwards. Normalization produces new spans.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Minimal positioned unit of text with font, style and page metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub font_size: f32,
    pub font_name: String,
    pub is_bold: bool,
    pub is_italic: bool,
    /// Page number (1-indexed)
    pub page_number: u32,
    pub bounding_box: BoundingBox,
    /// Bounding box of the line that encloses this span
    pub line_box: BoundingBox,
}

impl Span {
    /// Convenience constructor used by sources and tests. Line box defaults to
    /// the span box; style flags default to regular.
    pub fn new(text: &str, font_size: f32, page_number: u32, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.to_string(),
            font_size,
            font_name: String::new(),
            is_bold: false,
            is_italic: false,
            page_number,
            bounding_box,
            line_box: bounding_box,
        }
    }

    pub fn bold(mut self) -> Self {
        self.is_bold = true;
        self
    }

    pub fn with_font(mut self, font_name: &str) -> Self {
        self.font_name = font_name.to_string();
        self
    }

    pub fn with_line_box(mut self, line_box: BoundingBox) -> Self {
        self.line_box = line_box;
        self
    }

    /// Character count of the trimmed text
    pub fn char_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn top(&self) -> f32 {
        self.bounding_box.y0
    }

    pub fn bottom(&self) -> f32 {
        self.bounding_box.y1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub number: u32,
    pub width: f32,
    pub height: f32,
}

/// Everything the parser collaborator hands over for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanDocument {
    /// Source-document identifier used in ranking output
    pub name: String,
    pub pages: Vec<PageInfo>,
    /// Spans in document order
    pub spans: Vec<Span>,
}

impl SpanDocument {
    pub fn new(name: &str, spans: Vec<Span>) -> Self {
        Self {
            name: name.to_string(),
            pages: Vec::new(),
            spans,
        }
    }

    /// Size of the given page if the parser reported it
    pub fn page_size(&self, page_number: u32) -> Option<PageSize> {
        self.pages
            .iter()
            .find(|p| p.number == page_number)
            .map(|p| PageSize {
                width: p.width,
                height: p.height,
            })
    }
}

// ===== HEADING TYPES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        };
        f.write_str(label)
    }
}

/// A span accepted as a structural heading
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub span: Span,
    /// Always within [0, 1]
    pub confidence: f32,
    pub level: Option<HeadingLevel>,
}

impl Heading {
    pub fn new(span: Span, confidence: f32) -> Self {
        Self {
            span,
            confidence: confidence.clamp(0.0, 1.0),
            level: None,
        }
    }
}

// ===== SECTION TYPES =====

/// Contiguous run of spans from one heading boundary to the next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub text: String,
    pub page_number: u32,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    pub section: Section,
    pub score: f32,
    pub category: String,
    /// 1-based position in the ranked output
    pub rank: usize,
}

// ===== OUTPUT ARTIFACTS =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// RFC 3339 timestamp
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: RankingMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl RankingReport {
    pub fn new(metadata: RankingMetadata, ranked: &[RankedSection]) -> Self {
        let extracted_sections = ranked
            .iter()
            .map(|r| ExtractedSection {
                document: r.section.document.clone(),
                section_title: r.section.title.clone(),
                importance_rank: r.rank,
                page_number: r.section.page_number,
            })
            .collect();
        let subsection_analysis = ranked
            .iter()
            .map(|r| SubsectionAnalysis {
                document: r.section.document.clone(),
                refined_text: r.section.text.clone(),
                page_number: r.section.page_number,
            })
            .collect();

        Self {
            metadata,
            extracted_sections,
            subsection_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_confidence_is_clamped() {
        let span = Span::new("Results", 14.0, 1, BoundingBox::new(50.0, 100.0, 200.0, 114.0));
        assert_eq!(Heading::new(span.clone(), 1.4).confidence, 1.0);
        assert_eq!(Heading::new(span, -0.2).confidence, 0.0);
    }

    #[test]
    fn heading_level_serializes_as_label() {
        let entry = OutlineEntry {
            level: HeadingLevel::H2,
            text: "1.1 Scope".to_string(),
            page: 3,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "H2");
        assert_eq!(json["page"], 3);
    }

    #[test]
    fn page_size_lookup() {
        let mut doc = SpanDocument::new("doc", Vec::new());
        doc.pages.push(PageInfo {
            number: 1,
            width: 612.0,
            height: 792.0,
        });
        assert_eq!(doc.page_size(1).map(|p| p.height), Some(792.0));
        assert!(doc.page_size(2).is_none());
    }
}
