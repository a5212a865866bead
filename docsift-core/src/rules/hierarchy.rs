use crate::types::{Heading, HeadingLevel, Span};
use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTER_OR_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(chapter|part)\s+\d+").unwrap());
static NUMBERED_DEPTH_THREE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+\s").unwrap());
static NUMBERED_DEPTH_TWO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\s").unwrap());
static NUMBERED_DEPTH_ONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

const SIZE_TOLERANCE: f32 = 0.01;

/// Assigns H1/H2/H3 relative to the other headings of the same document.
///
/// Explicit numbering wins; otherwise the rank of the heading's size among
/// the distinct heading sizes decides.
#[derive(Debug, Clone)]
pub struct HeadingLevelClassifier {
    /// Distinct heading sizes, largest first
    sizes: Vec<f32>,
}

impl HeadingLevelClassifier {
    pub fn from_headings(headings: &[Heading]) -> Self {
        let mut sizes: Vec<f32> = Vec::new();
        for heading in headings {
            let size = heading.span.font_size;
            if !sizes.iter().any(|s| (s - size).abs() < SIZE_TOLERANCE) {
                sizes.push(size);
            }
        }
        sizes.sort_by(|a, b| b.total_cmp(a));
        Self { sizes }
    }

    pub fn distinct_sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn classify(&self, span: &Span) -> HeadingLevel {
        pattern_level(&span.text).unwrap_or_else(|| self.size_level(span.font_size))
    }

    fn size_level(&self, size: f32) -> HeadingLevel {
        // Same tolerance that merged the distinct sizes
        let at_least = |tier: f32| size >= tier - SIZE_TOLERANCE;
        match self.sizes.as_slice() {
            [largest, second, _, ..] => {
                if at_least(*largest) {
                    HeadingLevel::H1
                } else if at_least(*second) {
                    HeadingLevel::H2
                } else {
                    HeadingLevel::H3
                }
            }
            [largest, _] => {
                if at_least(*largest) {
                    HeadingLevel::H1
                } else {
                    HeadingLevel::H2
                }
            }
            _ => HeadingLevel::H1,
        }
    }
}

/// Level implied by explicit numbering or a chapter/part prefix
pub fn pattern_level(text: &str) -> Option<HeadingLevel> {
    let lowered = text.trim().to_lowercase();
    if CHAPTER_OR_PART.is_match(&lowered) || NUMBERED_DEPTH_ONE.is_match(&lowered) {
        Some(HeadingLevel::H1)
    } else if NUMBERED_DEPTH_THREE.is_match(&lowered) {
        Some(HeadingLevel::H3)
    } else if NUMBERED_DEPTH_TWO.is_match(&lowered) {
        Some(HeadingLevel::H2)
    } else {
        None
    }
}

/// Assign levels to every heading relative to the whole set
pub fn assign_levels(headings: Vec<Heading>) -> Vec<Heading> {
    let classifier = HeadingLevelClassifier::from_headings(&headings);
    headings
        .into_iter()
        .map(|mut heading| {
            heading.level = Some(classifier.classify(&heading.span));
            heading
        })
        .collect()
}
