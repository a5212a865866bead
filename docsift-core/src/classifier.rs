use crate::config::{HeadingConfig, StrategyKind};
use crate::model::{FeatureVector, HeadingModel, LayoutContext, LinearHeadingModel};
use crate::normalize::{is_all_caps, is_numeric_text};
use crate::rules::font_statistics::FontStatistics;
use crate::types::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;

/// "1. ", "1.1 " or a capitalized word followed by a space
pub(crate) static NUMBERED_OR_CAPITALIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.|\d+\.\d+|[A-Z][a-z]+) ").unwrap());

/// Heading forms checked against lowercased text; first match only
static LOWERCASE_HEADING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(chapter|section|part)\s+\d+",
        r"^\d+\.\s+",
        r"^\d+\.\d+\s+",
        r"^\d+\.\d+\.\d+\s+",
        r"^(introduction|conclusion|summary|abstract|methodology|results|discussion|references)$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// All-caps heading of at least ten characters, checked against original case
static ALL_CAPS_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s]{10,}$").unwrap());

/// Accept/reject decision for one span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_heading: bool,
    /// Always within [0, 1]
    pub confidence: f32,
}

impl Verdict {
    pub fn accept(confidence: f32) -> Self {
        Self {
            is_heading: true,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn reject(confidence: f32) -> Self {
        Self {
            is_heading: false,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Chosen once per run, never mixed
pub enum HeadingStrategy {
    RuleCascade,
    AdditiveScore,
    Learned(Box<dyn HeadingModel>),
}

impl fmt::Debug for HeadingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingStrategy::RuleCascade => f.write_str("RuleCascade"),
            HeadingStrategy::AdditiveScore => f.write_str("AdditiveScore"),
            HeadingStrategy::Learned(model) => write!(f, "Learned({})", model.name()),
        }
    }
}

impl From<StrategyKind> for HeadingStrategy {
    fn from(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::RuleCascade => HeadingStrategy::RuleCascade,
            StrategyKind::AdditiveScore => HeadingStrategy::AdditiveScore,
        }
    }
}

#[derive(Debug)]
pub struct HeadingClassifier {
    strategy: HeadingStrategy,
    config: HeadingConfig,
}

impl HeadingClassifier {
    pub fn new(strategy: HeadingStrategy, config: &HeadingConfig) -> Self {
        Self {
            strategy,
            config: config.clone(),
        }
    }

    /// Pick the strategy from config. A configured model that cannot be
    /// loaded falls back to the rule-based strategy.
    pub fn from_config(config: &HeadingConfig) -> Self {
        let strategy = match &config.model_path {
            Some(path) => match LinearHeadingModel::load(Path::new(path)) {
                Ok(model) => {
                    tracing::info!("🧠 Loaded heading model from {path}");
                    HeadingStrategy::Learned(Box::new(model))
                }
                Err(e) => {
                    tracing::warn!("⚠️  {e}; falling back to {:?}", config.strategy);
                    config.strategy.into()
                }
            },
            None => config.strategy.into(),
        };
        Self::new(strategy, config)
    }

    /// Use an injected model collaborator
    pub fn with_model(model: Box<dyn HeadingModel>, config: &HeadingConfig) -> Self {
        Self::new(HeadingStrategy::Learned(model), config)
    }

    pub fn has_learned_model(&self) -> bool {
        matches!(self.strategy, HeadingStrategy::Learned(_))
    }

    pub fn strategy(&self) -> &HeadingStrategy {
        &self.strategy
    }

    pub fn classify(&self, span: &Span, stats: &FontStatistics) -> Verdict {
        self.classify_with_layout(span, stats, &LayoutContext::default())
    }

    /// Same as `classify`, with neighbour whitespace available to the model
    pub fn classify_with_layout(
        &self,
        span: &Span,
        stats: &FontStatistics,
        layout: &LayoutContext,
    ) -> Verdict {
        match &self.strategy {
            HeadingStrategy::RuleCascade => self.rule_cascade(span, stats),
            HeadingStrategy::AdditiveScore => self.additive_score(span, stats),
            HeadingStrategy::Learned(model) => {
                learned_verdict(model.as_ref(), &FeatureVector::extract(span, stats, layout))
            }
        }
    }

    fn is_blacklisted(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.config.blacklist.iter().any(|b| b.to_lowercase() == lowered)
    }

    fn has_keyword(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.config.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    fn rule_cascade(&self, span: &Span, stats: &FontStatistics) -> Verdict {
        let rules = &self.config.rule_cascade;
        let text = span.text.trim();

        if self.is_blacklisted(text)
            || text.chars().count() < rules.min_chars
            || is_numeric_text(text)
            || span.top() < rules.header_band
            || span.bottom() > rules.footer_band
            || span.word_count() < rules.min_words
            || span.font_size < stats.body_size * rules.min_size_ratio
        {
            return Verdict::reject(0.0);
        }

        if NUMBERED_OR_CAPITALIZED.is_match(text) {
            Verdict::accept(rules.numbering_confidence)
        } else if self.has_keyword(text) {
            Verdict::accept(rules.keyword_confidence)
        } else if span.font_size >= stats.body_size * rules.large_size_ratio {
            Verdict::accept(rules.large_size_confidence)
        } else {
            Verdict::reject(0.0)
        }
    }

    fn additive_score(&self, span: &Span, stats: &FontStatistics) -> Verdict {
        let weights = &self.config.additive;
        let text = span.text.trim();
        let length = text.chars().count();

        if length < weights.min_chars || length > weights.max_chars {
            return Verdict::reject(0.0);
        }

        let mut score = 0.0;

        if span.font_size >= stats.body_size * weights.large_size_ratio {
            score += weights.large_size_weight;
        } else if span.font_size >= stats.body_size * weights.medium_size_ratio {
            score += weights.medium_size_weight;
        }

        if span.is_bold {
            score += weights.bold_weight;
        }

        if span.bounding_box.x0 < weights.left_margin {
            score += weights.left_margin_weight;
        }

        let lowered = text.to_lowercase();
        if LOWERCASE_HEADING_PATTERNS.iter().any(|p| p.is_match(&lowered))
            || ALL_CAPS_HEADING.is_match(text)
        {
            score += weights.pattern_weight;
        }

        if is_all_caps(text) && (weights.all_caps_min_chars..=weights.all_caps_max_chars).contains(&length) {
            score += weights.all_caps_weight;
        }

        if is_standalone_line(span, weights.standalone_ratio) {
            score += weights.standalone_weight;
        }

        if self.has_keyword(text) {
            score += weights.keyword_weight;
        }

        if score > weights.accept_threshold {
            Verdict::accept(score)
        } else {
            Verdict::reject(score)
        }
    }
}

/// Text height dominates the enclosing line height
fn is_standalone_line(span: &Span, ratio: f32) -> bool {
    let line_height = span.line_box.height();
    if line_height <= 0.0 {
        return false;
    }
    span.bounding_box.height() / line_height > ratio
}

/// Model failures degrade to a neutral rejection
fn learned_verdict(model: &dyn HeadingModel, features: &FeatureVector) -> Verdict {
    let label = match model.predict(features) {
        Ok(label) => label,
        Err(e) => {
            tracing::warn!("⚠️  heading model '{}' failed: {e}", model.name());
            return Verdict::reject(0.0);
        }
    };
    let is_heading = label == 1;

    let confidence = match model.predict_probabilities(features) {
        Some(Ok(distribution)) => distribution.get(1).copied().unwrap_or(0.0),
        Some(Err(e)) => {
            tracing::warn!("⚠️  heading model '{}' probabilities failed: {e}", model.name());
            if is_heading {
                1.0
            } else {
                0.0
            }
        }
        None => {
            if is_heading {
                1.0
            } else {
                0.0
            }
        }
    };

    if is_heading {
        Verdict::accept(confidence)
    } else {
        Verdict::reject(confidence)
    }
}
