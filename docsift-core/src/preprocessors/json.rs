//! JSON span dumps in the layout PyMuPDF's `get_text("dict")` spans use.
//!
//! Accepted shapes:
//!
//! ```text
//! [ {span}, ... ]
//! { "document": "name"?, "pages": [{number, width, height}]?, "spans": [{span}, ...] }
//! ```
//!
//! A span carries `text`, `size`, `font`, `flags`, `page` (1-based), `bbox`
//! and optionally `line_bbox`, `bold`, `italic`.

use super::preprocessor::SpanSource;
use crate::error::DocsiftError;
use crate::types::{BoundingBox, PageInfo, Span, SpanDocument};
use serde::Deserialize;
use std::path::Path;

/// PyMuPDF span flag bits
const FLAG_ITALIC: u32 = 1 << 1;
const FLAG_BOLD: u32 = 1 << 4;

#[derive(Debug, Deserialize)]
struct RawSpan {
    text: String,
    size: f32,
    #[serde(default)]
    font: String,
    #[serde(default)]
    flags: u32,
    page: u32,
    bbox: [f32; 4],
    #[serde(default)]
    line_bbox: Option<[f32; 4]>,
    #[serde(default)]
    bold: Option<bool>,
    #[serde(default)]
    italic: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Spans(Vec<RawSpan>),
    Document {
        #[serde(default)]
        document: Option<String>,
        #[serde(default)]
        pages: Vec<PageInfo>,
        spans: Vec<RawSpan>,
    },
}

fn to_box(b: [f32; 4]) -> BoundingBox {
    BoundingBox::new(b[0], b[1], b[2], b[3])
}

impl RawSpan {
    fn into_span(self, index: usize, document: &str) -> Result<Span, DocsiftError> {
        if self.page == 0 {
            return Err(DocsiftError::parse(
                document,
                format!("span {index}: page numbers start at 1"),
            ));
        }
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(DocsiftError::parse(
                document,
                format!("span {index}: invalid font size {}", self.size),
            ));
        }

        let font_lower = self.font.to_lowercase();
        let is_bold = self
            .bold
            .unwrap_or(self.flags & FLAG_BOLD != 0 || font_lower.contains("bold"));
        let is_italic = self
            .italic
            .unwrap_or(self.flags & FLAG_ITALIC != 0 || font_lower.contains("italic"));
        let bounding_box = to_box(self.bbox);

        Ok(Span {
            text: self.text,
            font_size: self.size,
            font_name: self.font,
            is_bold,
            is_italic,
            page_number: self.page,
            bounding_box,
            line_box: self.line_bbox.map(to_box).unwrap_or(bounding_box),
        })
    }
}

/// Reads span dumps written by an external PDF parser
#[derive(Debug, Default, Clone)]
pub struct JsonSpanSource;

impl JsonSpanSource {
    pub fn new() -> Self {
        Self
    }
}

impl SpanSource for JsonSpanSource {
    fn parse_str(&self, content: &str, name: &str) -> Result<SpanDocument, DocsiftError> {
        let raw: RawDocument = serde_json::from_str(content).map_err(|e| DocsiftError::parse(name, e))?;

        let (document, pages, raw_spans) = match raw {
            RawDocument::Spans(spans) => (name.to_string(), Vec::new(), spans),
            RawDocument::Document {
                document,
                pages,
                spans,
            } => (document.unwrap_or_else(|| name.to_string()), pages, spans),
        };

        let spans = raw_spans
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.into_span(i, &document))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("📄 {document}: {} spans over {} known page(s)", spans.len(), pages.len());
        Ok(SpanDocument {
            name: document,
            pages,
            spans,
        })
    }

    fn name(&self) -> &str {
        "json-spans"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_array_uses_given_name() {
        let json = r#"[
            {"text": "1. Introduction", "size": 18.0, "font": "Arial-BoldMT", "flags": 0,
             "page": 1, "bbox": [72, 90, 250, 108]},
            {"text": "Body", "size": 10.0, "font": "Arial", "flags": 2, "page": 1,
             "bbox": [72, 120, 300, 130], "line_bbox": [72, 118, 500, 132]}
        ]"#;
        let doc = JsonSpanSource.parse_str(json, "report").unwrap();
        assert_eq!(doc.name, "report");
        assert_eq!(doc.spans.len(), 2);
        assert!(doc.spans[0].is_bold);
        assert!(!doc.spans[0].is_italic);
        assert!(doc.spans[1].is_italic);
        assert_eq!(doc.spans[1].line_box.x1, 500.0);
        assert_eq!(doc.spans[0].line_box, doc.spans[0].bounding_box);
    }

    #[test]
    fn document_object_with_pages() {
        let json = r#"{
            "document": "guide.pdf",
            "pages": [{"number": 1, "width": 612, "height": 792}],
            "spans": [{"text": "Hi there", "size": 11, "flags": 16, "page": 1, "bbox": [0, 0, 10, 11]}]
        }"#;
        let doc = JsonSpanSource.parse_str(json, "ignored").unwrap();
        assert_eq!(doc.name, "guide.pdf");
        assert_eq!(doc.page_size(1).map(|p| p.width), Some(612.0));
        assert!(doc.spans[0].is_bold);
    }

    #[test]
    fn explicit_style_flags_win() {
        let json = r#"[{"text": "x", "size": 9, "font": "Times-Bold", "page": 2, "bbox": [0,0,1,1], "bold": false}]"#;
        let doc = JsonSpanSource.parse_str(json, "d").unwrap();
        assert!(!doc.spans[0].is_bold);
        assert_eq!(doc.spans[0].page_number, 2);
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = JsonSpanSource.parse_str("{\"spans\": 3}", "broken").unwrap_err();
        assert!(matches!(err, DocsiftError::Parse { ref document, .. } if document == "broken"));

        let zero_page = r#"[{"text": "x", "size": 9, "page": 0, "bbox": [0,0,1,1]}]"#;
        assert!(JsonSpanSource.parse_str(zero_page, "d").is_err());
    }

    #[test]
    fn load_names_document_after_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        std::fs::write(&path, r#"[{"text": "Nice", "size": 12, "page": 1, "bbox": [0,0,1,1]}]"#).unwrap();
        let doc = JsonSpanSource.load(&path).unwrap();
        assert_eq!(doc.name, "cities");
        assert!(JsonSpanSource.supports_file_type(&path));
        assert!(!JsonSpanSource.supports_file_type(Path::new("cities.pdf")));

        let missing = JsonSpanSource.load(&dir.path().join("absent.json")).unwrap_err();
        assert!(missing.is_recoverable());
    }
}
