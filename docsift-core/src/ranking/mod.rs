// Persona-driven section ranking
//
// - keywords.rs: keyword extraction and the shared term set
// - similarity.rs: embedding collaborator boundary and cosine similarity
// - ranker.rs: scoring, categorization and coverage-aware selection

pub mod keywords;
pub mod ranker;
pub mod similarity;

pub use keywords::{domain_keywords, extract_keywords, task_keywords, KeywordSet};
pub use ranker::{ScoreFactors, SectionRanker};
pub use similarity::{cosine_similarity, Embedder, HashedBagOfWords, SemanticScorer};
