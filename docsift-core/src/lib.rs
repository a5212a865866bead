// Docsift Core Library
//
// Turns positioned text spans from a parsed document into a titled,
// leveled outline, and ranks document sections for a persona and task.

pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod preprocessors;
pub mod processor;
pub mod ranking;
pub mod rules;
pub mod task;
pub mod types;

// Re-export main types and functions for easy use
pub use classifier::{HeadingClassifier, HeadingStrategy, Verdict};
pub use config::DocsiftConfig;
pub use error::DocsiftError;
pub use model::{FeatureVector, HeadingModel, LayoutContext, LinearHeadingModel};
pub use preprocessors::{JsonSpanSource, SpanSource};
pub use processor::{BatchReport, DocumentProcessor, OutlineResult, RankingOutcome, SkippedDocument};
pub use ranking::{Embedder, KeywordSet, SectionRanker, SemanticScorer};
pub use rules::{FontStatistics, OutlineEngine};
pub use task::TaskInput;
pub use types::*;
