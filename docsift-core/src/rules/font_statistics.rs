use crate::config::FontStatisticsConfig;
use crate::types::{PageSize, Span};

pub const DEFAULT_BODY_SIZE: f32 = 12.0;
pub const DEFAULT_PAGE_WIDTH: f32 = 595.0;
pub const DEFAULT_PAGE_HEIGHT: f32 = 800.0;

/// Sizes closer than this are counted as the same size
const SIZE_TOLERANCE: f32 = 0.01;

/// Font usage summary for one document (or one page)
#[derive(Debug, Clone, PartialEq)]
pub struct FontStatistics {
    /// Most frequent size among spans longer than the length filter
    pub body_size: f32,
    /// (size, count) pairs in first-seen order
    pub size_counts: Vec<(f32, usize)>,
    /// Page size when the parser reported one
    pub page_size: Option<PageSize>,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            body_size: DEFAULT_BODY_SIZE,
            size_counts: Vec::new(),
            page_size: None,
        }
    }
}

impl FontStatistics {
    /// Build the size histogram and pick the dominant body size.
    ///
    /// Ties between equally frequent sizes go to the size encountered first.
    /// An empty filtered set yields the configured default body size.
    pub fn analyze(spans: &[Span], config: &FontStatisticsConfig) -> Self {
        let mut size_counts: Vec<(f32, usize)> = Vec::new();

        for span in spans.iter().filter(|s| s.char_len() > config.min_text_chars) {
            if let Some(existing) = size_counts
                .iter_mut()
                .find(|(size, _)| (size - span.font_size).abs() < SIZE_TOLERANCE)
            {
                existing.1 += 1;
            } else {
                size_counts.push((span.font_size, 1));
            }
        }

        let mut body_size = config.default_body_size;
        let mut best_count = 0;
        for &(size, count) in &size_counts {
            if count > best_count {
                body_size = size;
                best_count = count;
            }
        }

        tracing::debug!(
            "📏 Font statistics: body {:.1}pt over {} distinct sizes",
            body_size,
            size_counts.len()
        );

        Self {
            body_size,
            size_counts,
            page_size: None,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<PageSize>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_width(&self) -> f32 {
        self.page_size.map(|p| p.width).unwrap_or(DEFAULT_PAGE_WIDTH)
    }

    pub fn page_height(&self) -> f32 {
        self.page_size.map(|p| p.height).unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    pub fn count_for(&self, size: f32) -> usize {
        self.size_counts
            .iter()
            .find(|(s, _)| (s - size).abs() < SIZE_TOLERANCE)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Size relative to body text
    pub fn size_ratio(&self, size: f32) -> f32 {
        if self.body_size > 0.0 {
            size / self.body_size
        } else {
            1.0
        }
    }
}
