use crate::error::DocsiftError;
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Top-level configuration. Every section falls back to its defaults when
/// omitted from the YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocsiftConfig {
    #[serde(default)]
    pub font_statistics: FontStatisticsConfig,
    #[serde(default)]
    pub heading: HeadingConfig,
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

impl DocsiftConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self, DocsiftError> {
        let content = fs::read_to_string(path)
            .map_err(|e| DocsiftError::Config(format!("{path}: {e}")))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, DocsiftError> {
        serde_yaml::from_str(content).map_err(|e| DocsiftError::Config(e.to_string()))
    }

    /// Load config with fallback to defaults
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Failed to load config from {p} ({e}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, DocsiftError> {
        serde_yaml::to_string(self).map_err(|e| DocsiftError::Config(e.to_string()))
    }
}

// ===== FONT STATISTICS =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStatisticsConfig {
    /// Spans with this many characters or fewer are ignored
    pub min_text_chars: usize,
    /// Body size reported when no span survives the filter
    pub default_body_size: f32,
}

impl Default for FontStatisticsConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 3,
            default_body_size: 12.0,
        }
    }
}

// ===== HEADING CLASSIFIER =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// First-match-wins accept/reject cascade
    RuleCascade,
    /// Independent signals summed into a confidence
    AdditiveScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Rule-based strategy; also the fallback when a model fails to load
    pub strategy: StrategyKind,
    /// Serialized heading model (JSON or YAML). Missing files are not fatal.
    #[serde(default)]
    pub model_path: Option<String>,
    /// Generic texts that are never headings (case-insensitive exact match)
    pub blacklist: Vec<String>,
    /// Words whose presence suggests a heading
    pub keywords: Vec<String>,
    #[serde(default)]
    pub rule_cascade: RuleCascadeConfig,
    #[serde(default)]
    pub additive: AdditiveScoreConfig,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::AdditiveScore,
            model_path: None,
            blacklist: strings(&[
                "page",
                "contents",
                "table of contents",
                "index",
                "overview",
                "copyright",
                "version",
                "revision history",
                "acknowledgements",
            ]),
            keywords: strings(&[
                "introduction",
                "background",
                "methodology",
                "results",
                "conclusion",
                "summary",
                "overview",
                "abstract",
            ]),
            rule_cascade: RuleCascadeConfig::default(),
            additive: AdditiveScoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCascadeConfig {
    pub min_chars: usize,
    pub min_words: usize,
    /// Spans whose top is above this y are page headers
    pub header_band: f32,
    /// Spans whose bottom is below this y are page footers
    pub footer_band: f32,
    /// Reject below this multiple of body size
    pub min_size_ratio: f32,
    /// Accept at `large_size_confidence` at or above this multiple
    pub large_size_ratio: f32,
    pub numbering_confidence: f32,
    pub keyword_confidence: f32,
    pub large_size_confidence: f32,
}

impl Default for RuleCascadeConfig {
    fn default() -> Self {
        Self {
            min_chars: 5,
            min_words: 2,
            header_band: 30.0,
            footer_band: 750.0,
            min_size_ratio: 1.12,
            large_size_ratio: 1.25,
            numbering_confidence: 1.0,
            keyword_confidence: 0.95,
            large_size_confidence: 0.85,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditiveScoreConfig {
    pub min_chars: usize,
    pub max_chars: usize,
    pub large_size_ratio: f32,
    pub large_size_weight: f32,
    pub medium_size_ratio: f32,
    pub medium_size_weight: f32,
    pub bold_weight: f32,
    pub left_margin: f32,
    pub left_margin_weight: f32,
    pub pattern_weight: f32,
    pub all_caps_min_chars: usize,
    pub all_caps_max_chars: usize,
    pub all_caps_weight: f32,
    /// Text height over enclosing line height above which a span stands alone
    pub standalone_ratio: f32,
    pub standalone_weight: f32,
    pub keyword_weight: f32,
    /// Accept when the summed score is strictly greater than this
    pub accept_threshold: f32,
}

impl Default for AdditiveScoreConfig {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 200,
            large_size_ratio: 1.2,
            large_size_weight: 0.4,
            medium_size_ratio: 1.1,
            medium_size_weight: 0.2,
            bold_weight: 0.3,
            left_margin: 100.0,
            left_margin_weight: 0.1,
            pattern_weight: 0.3,
            all_caps_min_chars: 5,
            all_caps_max_chars: 50,
            all_caps_weight: 0.2,
            standalone_ratio: 0.8,
            standalone_weight: 0.2,
            keyword_weight: 0.2,
            accept_threshold: 0.5,
        }
    }
}

// ===== TITLE EXTRACTION =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Only spans longer than this count toward the largest first-page size
    pub max_size_min_chars: usize,
    /// Candidates must start above this fraction of the page height
    pub top_fraction: f32,
    /// Candidates must be at least this fraction of the largest size
    pub size_fraction: f32,
    pub candidate_min_chars: usize,
    /// Minimum length for the good-title-line predicate
    pub line_min_chars: usize,
    /// Consecutive candidates closer than this (top-y delta) are grouped
    pub max_line_gap: f32,
    pub generic_phrases: Vec<String>,
    pub untitled: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            max_size_min_chars: 5,
            top_fraction: 0.40,
            size_fraction: 0.85,
            candidate_min_chars: 3,
            line_min_chars: 6,
            max_line_gap: 40.0,
            generic_phrases: strings(&[
                "page",
                "contents",
                "table of contents",
                "index",
                "draft",
                "confidential",
                "copyright",
            ]),
            untitled: "Untitled Document".to_string(),
        }
    }
}

// ===== OUTLINE ASSEMBLY =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Dedup keys of this many characters or fewer are dropped
    pub min_key_chars: usize,
    #[serde(default)]
    pub keyword_boost: KeywordBoostConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            min_key_chars: 2,
            keyword_boost: KeywordBoostConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

/// Promote early spans that mention a dominant document keyword
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordBoostConfig {
    #[serde(default)]
    pub enabled: bool,
    /// How many leading spans are inspected
    pub lookahead_spans: usize,
    /// How many document keywords are extracted
    pub top_keywords: usize,
}

impl Default for KeywordBoostConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            lookahead_spans: 15,
            top_keywords: 10,
        }
    }
}

/// Best-effort outline used when no heading survives classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub max_page: u32,
    /// Spans must be longer than this to be considered at all
    pub span_min_chars: usize,
    pub text_min_chars: usize,
    /// Texts with a digit need at least this many words
    pub digit_min_words: usize,
    /// Single words qualify as H2 above this multiple of body size
    pub single_word_size_ratio: f32,
    pub generic_phrases: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_page: 2,
            span_min_chars: 5,
            text_min_chars: 6,
            digit_min_words: 3,
            single_word_size_ratio: 1.2,
            generic_phrases: strings(&["page", "table of contents", "contents", "index"]),
        }
    }
}

// ===== SECTION SEGMENTATION =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Spans strictly larger than this may open a section
    pub size_threshold: f32,
    /// Large spans must be shorter than this to open a section
    pub max_title_chars: usize,
    /// Title of the implicit section holding leading body text
    pub implicit_title: String,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            size_threshold: 12.0,
            max_title_chars: 100,
            implicit_title: "Introduction".to_string(),
        }
    }
}

// ===== SECTION RANKING =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub body_keywords: f32,
    pub title_keywords: f32,
    pub topical: f32,
    pub social: f32,
    pub budget: f32,
    pub semantic: f32,
}

impl RankingWeights {
    pub fn total(&self) -> f32 {
        self.body_keywords + self.title_keywords + self.topical + self.social + self.budget + self.semantic
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            body_keywords: 0.3,
            title_keywords: 0.2,
            topical: 0.2,
            social: 0.15,
            budget: 0.1,
            semantic: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub terms: Vec<String>,
}

fn category(name: &str, terms: &[&str]) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        terms: strings(terms),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    #[serde(default)]
    pub weights: RankingWeights,
    pub topical_terms: Vec<String>,
    pub social_terms: Vec<String>,
    pub budget_terms: Vec<String>,
    /// Applied when the body contains any topical term
    pub topical_multiplier: f32,
    /// Checked in order; earlier categories win ties
    pub categories: Vec<CategoryConfig>,
    pub fallback_category: String,
    /// Coverage pass order
    pub priority: Vec<String>,
    /// Category that receives a second pick during coverage
    pub bonus_category: Option<String>,
    pub top_n: usize,
    /// Frequency-derived keywords added to the task terms
    pub document_keywords: usize,
    /// Score the semantic factor with the built-in hashed embedder
    #[serde(default = "default_true")]
    pub semantic_similarity: bool,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

fn default_embedding_dimensions() -> usize {
    256
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            topical_terms: strings(&[
                "beach",
                "nightlife",
                "adventure",
                "fun",
                "party",
                "sport",
                "entertainment",
            ]),
            social_terms: strings(&["group", "friends", "together", "share", "social", "activities"]),
            budget_terms: strings(&["affordable", "budget", "cheap", "deal", "save", "cost", "price"]),
            topical_multiplier: 1.5,
            categories: vec![
                category("cities", &["city", "cities", "location", "place", "destination"]),
                category(
                    "activities",
                    &[
                        "activities",
                        "adventure",
                        "things to do",
                        "sports",
                        "explore",
                        "entertainment",
                        "nightlife",
                    ],
                ),
                category("food", &["restaurant", "cuisine", "food", "dining", "culinary"]),
                category("planning", &["tips", "tricks", "guide", "planning", "packing", "travel"]),
            ],
            fallback_category: "other".to_string(),
            priority: strings(&["cities", "activities", "food", "planning"]),
            bonus_category: Some("activities".to_string()),
            top_n: 5,
            document_keywords: 10,
            semantic_similarity: true,
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}
