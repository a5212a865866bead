// Main rules module - delegates to semantic sub-modules
// This file coordinates the outline pipeline but actual implementations are in:
// - engine.rs: OutlineEngine and the sequential heading rules
// - font_statistics.rs: Body size and size histogram
// - title_detection.rs: First-page title grouping
// - hierarchy.rs: H1/H2/H3 assignment
// - fallback.rs: Outline for documents with no accepted heading
// - segmentation.rs: Section boundaries for ranking

pub mod engine;
pub mod fallback;
pub mod font_statistics;
pub mod hierarchy;
pub mod segmentation;
pub mod title_detection;

pub use engine::*;
pub use font_statistics::FontStatistics;
pub use hierarchy::{assign_levels, HeadingLevelClassifier};
pub use segmentation::SectionSegmenter;
pub use title_detection::TitleExtractor;
