use crate::classifier::HeadingClassifier;
use crate::config::DocsiftConfig;
use crate::error::DocsiftError;
use crate::model::LayoutContext;
use crate::normalize::{normalize_key, normalize_spans};
use crate::ranking::keywords::extract_keywords;
use crate::types::*;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::fallback::fallback_outline;
use super::font_statistics::FontStatistics;
use super::hierarchy::assign_levels;
use super::title_detection::TitleExtractor;

// Debug configuration for pipeline tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.filter_patterns.iter().any(|pattern| {
            // Try regex first, fall back to simple string contains
            match Regex::new(pattern) {
                Ok(regex) => regex.is_match(text),
                Err(_) => text.contains(pattern.as_str()),
            }
        })
    }
}

/// Trace headings matching the debug filters after a pipeline stage
pub fn debug_pipeline_headings(rule_name: &str, headings: &[Heading], debug_config: &DebugConfig) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matching: Vec<_> = headings
        .iter()
        .enumerate()
        .filter(|(_, h)| debug_config.matches(&h.span.text))
        .collect();

    if matching.is_empty() {
        return;
    }

    tracing::info!("🔍 [{}] {} matching headings", rule_name, matching.len());
    for (index, heading) in matching {
        let preview: String = heading.span.text.chars().take(47).collect();
        tracing::info!(
            "  Heading {}: \"{}\" (page {}, {:.1}pt, confidence {:.2}, level {:?})",
            index,
            preview,
            heading.span.page_number,
            heading.span.font_size,
            heading.confidence,
            heading.level
        );
    }
}

// Sequential heading pipeline infrastructure
pub trait HeadingRule {
    fn apply(&self, headings: Vec<Heading>) -> Vec<Heading>;
    fn name(&self) -> &str;
}

/// Accept early spans that mention one of the document's dominant keywords
pub struct KeywordBoostRule<'a> {
    spans: &'a [Span],
    keywords: Vec<String>,
    lookahead: usize,
}

impl<'a> KeywordBoostRule<'a> {
    pub fn new(spans: &'a [Span], top_keywords: usize, lookahead: usize) -> Self {
        let text = spans
            .iter()
            .filter(|s| s.char_len() > 3)
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            spans,
            keywords: extract_keywords(&text, top_keywords, &[]),
            lookahead,
        }
    }
}

impl HeadingRule for KeywordBoostRule<'_> {
    fn apply(&self, mut headings: Vec<Heading>) -> Vec<Heading> {
        for span in self.spans.iter().take(self.lookahead) {
            let lowered = span.text.to_lowercase();
            if span.char_len() > 3 && self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
                headings.push(Heading::new(span.clone(), 1.0));
            }
        }
        headings
    }

    fn name(&self) -> &str {
        "KeywordBoost"
    }
}

/// Keep the first heading per (normalized text, page); drop very short keys
pub struct DeduplicationRule {
    min_key_chars: usize,
}

impl DeduplicationRule {
    pub fn new(min_key_chars: usize) -> Self {
        Self { min_key_chars }
    }
}

impl HeadingRule for DeduplicationRule {
    fn apply(&self, headings: Vec<Heading>) -> Vec<Heading> {
        let mut seen = HashSet::new();
        headings
            .into_iter()
            .filter(|h| {
                let key = normalize_key(&h.span.text);
                key.chars().count() > self.min_key_chars && seen.insert((key, h.span.page_number))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "Deduplication"
    }
}

pub struct LevelAssignmentRule;

impl HeadingRule for LevelAssignmentRule {
    fn apply(&self, headings: Vec<Heading>) -> Vec<Heading> {
        assign_levels(headings)
    }

    fn name(&self) -> &str {
        "LevelAssignment"
    }
}

/// Turns one document's spans into a title and a leveled outline
pub struct OutlineEngine {
    config: DocsiftConfig,
    classifier: HeadingClassifier,
    debug_config: DebugConfig,
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl OutlineEngine {
    pub fn new(config: &DocsiftConfig, classifier: HeadingClassifier) -> Self {
        Self {
            config: config.clone(),
            classifier,
            debug_config: DebugConfig::disabled(),
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    pub fn from_config(config: &DocsiftConfig) -> Self {
        Self::new(config, HeadingClassifier::from_config(&config.heading))
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    pub fn classifier(&self) -> &HeadingClassifier {
        &self.classifier
    }

    pub fn extract(&self, document: &SpanDocument) -> Outline {
        tracing::info!("⚙️  Extracting outline for {}", document.name);

        let spans = normalize_spans(&document.spans);
        let stats = FontStatistics::analyze(&spans, &self.config.font_statistics)
            .with_page_size(document.page_size(1));
        let title = TitleExtractor::new(&self.config.title).extract(&spans, &stats);

        let headings = self.detect_headings(&spans, &stats);
        debug_pipeline_headings("Classification", &headings, &self.debug_config);
        let mut headings = self.apply_rules(&spans, headings);
        headings.sort_by(|a, b| {
            a.span
                .page_number
                .cmp(&b.span.page_number)
                .then(a.span.top().total_cmp(&b.span.top()))
        });

        let mut outline: Vec<OutlineEntry> = headings
            .into_iter()
            .filter_map(|h| {
                h.level.map(|level| OutlineEntry {
                    level,
                    text: h.span.text,
                    page: h.span.page_number,
                })
            })
            .collect();

        if outline.is_empty() && self.config.outline.fallback.enabled {
            let empty = DocsiftError::EmptyResult {
                document: document.name.clone(),
            };
            tracing::warn!("⚠️  {empty}; using fallback outline");
            outline = fallback_outline(&spans, &stats, &self.config.outline.fallback);
        }

        tracing::info!("   ✅ {}: \"{}\" with {} heading(s)", document.name, title, outline.len());
        Outline { title, outline }
    }

    /// Classify every span, giving the classifier neighbour whitespace
    pub fn detect_headings(&self, spans: &[Span], stats: &FontStatistics) -> Vec<Heading> {
        spans
            .iter()
            .enumerate()
            .filter_map(|(i, span)| {
                let verdict = self
                    .classifier
                    .classify_with_layout(span, stats, &layout_context(spans, i));
                tracing::debug!(
                    "   {} \"{}\" ({:.2})",
                    if verdict.is_heading { "✔" } else { "✘" },
                    span.text,
                    verdict.confidence
                );
                verdict
                    .is_heading
                    .then(|| Heading::new(span.clone(), verdict.confidence))
            })
            .collect()
    }

    fn apply_rules(&self, spans: &[Span], mut headings: Vec<Heading>) -> Vec<Heading> {
        let outline_config = &self.config.outline;
        let mut rules: Vec<Box<dyn HeadingRule + '_>> = Vec::new();
        if outline_config.keyword_boost.enabled {
            rules.push(Box::new(KeywordBoostRule::new(
                spans,
                outline_config.keyword_boost.top_keywords,
                outline_config.keyword_boost.lookahead_spans,
            )));
        }
        rules.push(Box::new(DeduplicationRule::new(outline_config.min_key_chars)));
        rules.push(Box::new(LevelAssignmentRule));

        // Clear previous timings
        self.rule_timings.borrow_mut().clear();

        for rule in rules {
            let rule_start = Instant::now();
            headings = rule.apply(headings);
            self.rule_timings
                .borrow_mut()
                .push((rule.name().to_string(), rule_start.elapsed()));
            tracing::debug!("   ✅ {} headings after {}", headings.len(), rule.name());
            debug_pipeline_headings(rule.name(), &headings, &self.debug_config);
        }
        headings
    }
}

/// Vertical gaps to the previous and next span on the same page
fn layout_context(spans: &[Span], index: usize) -> LayoutContext {
    let span = &spans[index];
    let above = index
        .checked_sub(1)
        .and_then(|i| spans.get(i))
        .filter(|prev| prev.page_number == span.page_number)
        .map(|prev| (span.top() - prev.bottom()).max(0.0))
        .unwrap_or(0.0);
    let below = spans
        .get(index + 1)
        .filter(|next| next.page_number == span.page_number)
        .map(|next| (next.top() - span.bottom()).max(0.0))
        .unwrap_or(0.0);
    LayoutContext {
        whitespace_above: above,
        whitespace_below: below,
    }
}
