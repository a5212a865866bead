//! Learned heading model boundary.
//!
//! A trained classifier is an external collaborator. The core only extracts
//! a fixed feature vector and asks the model for a label and, when the model
//! supports it, a class distribution. Training is out of scope; a
//! serialized linear model can be loaded from JSON or YAML.

use crate::classifier::NUMBERED_OR_CAPITALIZED;
use crate::error::DocsiftError;
use crate::normalize::is_all_caps;
use crate::rules::font_statistics::FontStatistics;
use crate::types::Span;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FEATURE_COUNT: usize = 23;

/// Feature order shared with the training side
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "size",
    "num_words",
    "num_chars",
    "is_all_caps",
    "y0",
    "y1",
    "rel_font_size",
    "has_numbering",
    "avg_word_len",
    "num_digits",
    "num_upper",
    "num_lower",
    "pct_digits",
    "pct_upper",
    "pct_lower",
    "ends_with_colon",
    "starts_with_bullet",
    "is_bold",
    "is_italic",
    "is_centered",
    "whitespace_ratio",
    "rel_y0",
    "rel_y1",
];

const EPSILON: f32 = 1e-6;
/// Horizontal slack (fraction of page width) for a span to count as centered
const CENTER_TOLERANCE: f32 = 0.15;

/// Vertical whitespace around a span, measured against its neighbours on the
/// same page. Empty when the span is classified on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutContext {
    pub whitespace_above: f32,
    pub whitespace_below: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn extract(span: &Span, stats: &FontStatistics, layout: &LayoutContext) -> Self {
        let text = span.text.trim();
        let words: Vec<&str> = text.split_whitespace().collect();
        let num_words = words.len() as f32;
        let num_chars = text.chars().count() as f32;
        let page_width = stats.page_width();
        let page_height = stats.page_height();
        let bbox = &span.bounding_box;

        let avg_word_len = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f32 / num_words
        };
        let num_digits = text.chars().filter(|c| c.is_ascii_digit()).count() as f32;
        let num_upper = text.chars().filter(|c| c.is_uppercase()).count() as f32;
        let num_lower = text.chars().filter(|c| c.is_lowercase()).count() as f32;

        let font_name = span.font_name.to_lowercase();
        let is_bold = span.is_bold || font_name.contains("bold");
        let is_italic = span.is_italic || font_name.contains("italic");
        let is_centered = (bbox.center_x() - page_width / 2.0).abs() < page_width * CENTER_TOLERANCE;

        Self([
            span.font_size,
            num_words,
            num_chars,
            flag(is_all_caps(text)),
            bbox.y0,
            bbox.y1,
            span.font_size / (stats.body_size + EPSILON),
            flag(NUMBERED_OR_CAPITALIZED.is_match(text)),
            avg_word_len,
            num_digits,
            num_upper,
            num_lower,
            num_digits / (num_chars + EPSILON),
            num_upper / (num_chars + EPSILON),
            num_lower / (num_chars + EPSILON),
            flag(text.ends_with(':')),
            flag(text.starts_with(['-', '*', '\u{2022}'])),
            flag(is_bold),
            flag(is_italic),
            flag(is_centered),
            (layout.whitespace_above + layout.whitespace_below) / (page_height + EPSILON),
            bbox.y0 / (page_height + EPSILON),
            bbox.y1 / (page_height + EPSILON),
        ])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Injected heading classifier. Label 1 means "heading".
pub trait HeadingModel {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<usize>;

    /// Class distribution indexed by label, for models that expose one
    fn predict_probabilities(&self, _features: &FeatureVector) -> Option<anyhow::Result<Vec<f32>>> {
        None
    }

    fn name(&self) -> &str;
}

/// Logistic model over the 23 features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearHeadingModel {
    pub weights: Vec<f32>,
    pub bias: f32,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.5
}

impl LinearHeadingModel {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self, DocsiftError> {
        let model = Self {
            weights,
            bias,
            threshold: default_threshold(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a serialized model; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load(path: &Path) -> Result<Self, DocsiftError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocsiftError::collaborator("heading model", format!("{}: {e}", path.display())))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let model: Self = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| DocsiftError::collaborator("heading model", e))?
        } else {
            serde_json::from_str(&content).map_err(|e| DocsiftError::collaborator("heading model", e))?
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), DocsiftError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(DocsiftError::collaborator(
                "heading model",
                format!("expected {FEATURE_COUNT} weights, found {}", self.weights.len()),
            ));
        }
        Ok(())
    }

    fn probability(&self, features: &FeatureVector) -> f32 {
        let z: f32 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        1.0 / (1.0 + (-z).exp())
    }
}

impl HeadingModel for LinearHeadingModel {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<usize> {
        Ok(usize::from(self.probability(features) >= self.threshold))
    }

    fn predict_probabilities(&self, features: &FeatureVector) -> Option<anyhow::Result<Vec<f32>>> {
        let p = self.probability(features);
        if p.is_finite() {
            Some(Ok(vec![1.0 - p, p]))
        } else {
            Some(Err(anyhow::anyhow!("non-finite probability")))
        }
    }

    fn name(&self) -> &str {
        "linear"
    }
}
