use crate::config::DocsiftConfig;
use crate::error::DocsiftError;
use crate::normalize::normalize_spans;
use crate::preprocessors::{document_name, JsonSpanSource, SpanSource};
use crate::ranking::keywords::{extract_keywords, KeywordSet};
use crate::ranking::ranker::SectionRanker;
use crate::ranking::similarity::{HashedBagOfWords, SemanticScorer};
use crate::rules::engine::{DebugConfig, OutlineEngine};
use crate::rules::segmentation::SectionSegmenter;
use crate::task::TaskInput;
use crate::types::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Per-document step timings, with an optional breakdown of the heading
/// rules that ran inside outline extraction
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
    rule_timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
            rule_timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    /// Rule timings are already part of the enclosing step, so they are
    /// reported under it and left out of the total
    pub fn record_rules(&mut self, rule_timings: &[(String, Duration)]) {
        if self.enabled {
            self.rule_timings.extend(rule_timings.iter().cloned());
        }
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn rule_timings(&self) -> &[(String, Duration)] {
        &self.rule_timings
    }

    pub fn total(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    pub fn print_summary(&self, document: &str) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total = self.total();
        println!("\n📊 {}:", document);
        for (step, duration) in &self.timings {
            println!(
                "   {:.<35} {:>6}µs ({:.1}%)",
                step,
                duration.as_micros(),
                share(*duration, total)
            );
        }
        for (rule, duration) in &self.rule_timings {
            println!("     ↳ {:.<31} {:>6}µs", rule, duration.as_micros());
        }
        println!("   {:.<35} {:>6}µs", "Total", total.as_micros());
    }
}

fn share(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.as_secs_f64() / total.as_secs_f64() * 100.0
    }
}

/// A document left out of a batch and why
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a sequential batch: successes in input order plus skips
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    pub processed: Vec<T>,
    pub skipped: Vec<SkippedDocument>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    fn skip(&mut self, path: &Path, error: &DocsiftError) {
        tracing::warn!("⚠️  Skipping {}: {error}", path.display());
        self.skipped.push(SkippedDocument {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });
    }
}

/// Outline for one input file
#[derive(Debug, Clone)]
pub struct OutlineResult {
    pub path: PathBuf,
    pub document: String,
    pub outline: Outline,
}

#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub report: RankingReport,
    pub skipped: Vec<SkippedDocument>,
}

pub struct DocumentProcessor {
    source: Box<dyn SpanSource>,
    engine: OutlineEngine,
    ranker: SectionRanker,
    config: DocsiftConfig,
    profiling: bool,
}

impl DocumentProcessor {
    /// Create DocumentProcessor with full dependency injection
    pub fn new_with_dependencies(
        source: Box<dyn SpanSource>,
        engine: OutlineEngine,
        ranker: SectionRanker,
        config: &DocsiftConfig,
    ) -> Self {
        Self {
            source,
            engine,
            ranker,
            config: config.clone(),
            profiling: false,
        }
    }

    /// JSON span source, configured heading strategy, and the built-in
    /// embedder when semantic similarity is enabled
    pub fn from_config(config: &DocsiftConfig) -> Self {
        let semantic = if config.ranking.semantic_similarity {
            SemanticScorer::new(Box::new(HashedBagOfWords::new(config.ranking.embedding_dimensions)))
        } else {
            SemanticScorer::disabled()
        };
        Self::new_with_dependencies(
            Box::new(JsonSpanSource::new()),
            OutlineEngine::from_config(config),
            SectionRanker::new(&config.ranking, semantic),
            config,
        )
    }

    pub fn set_profiling(&mut self, enabled: bool) {
        self.profiling = enabled;
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.engine.set_debug_config(debug_config);
    }

    pub fn engine(&self) -> &OutlineEngine {
        &self.engine
    }

    pub fn source(&self) -> &dyn SpanSource {
        self.source.as_ref()
    }

    /// Title and leveled outline for one span file
    pub fn process_outline(&self, path: &Path) -> Result<Outline, DocsiftError> {
        let mut profiler = StepProfiler::new(self.profiling);
        let document = profiler.time_step("Load spans", || self.source.load(path))?;
        let outline = profiler.time_step("Extract outline", || self.engine.extract(&document));
        profiler.record_rules(&self.engine.rule_timings.borrow());
        profiler.print_summary(&document.name);
        Ok(outline)
    }

    /// Documents are processed one after another; unreadable ones are skipped
    pub fn outline_batch(&self, paths: &[PathBuf]) -> BatchReport<OutlineResult> {
        let mut report = BatchReport::default();
        for path in paths {
            match self.process_outline(path) {
                Ok(outline) => report.processed.push(OutlineResult {
                    path: path.clone(),
                    document: document_name(path),
                    outline,
                }),
                Err(e) => report.skip(path, &e),
            }
        }
        tracing::info!(
            "📚 Outlined {}/{} document(s)",
            report.processed.len(),
            paths.len()
        );
        report
    }

    /// Sections of one span file, segmented on normalized spans
    pub fn process_sections(&self, path: &Path) -> Result<(String, Vec<Section>), DocsiftError> {
        let document = self.source.load(path)?;
        let spans = normalize_spans(&document.spans);
        let sections = SectionSegmenter::new(&self.config.segmentation).segment(&spans, &document.name);
        Ok((document.name, sections))
    }

    /// Load and validate the task file, then rank. A bad task file aborts.
    pub fn rank_batch(&self, task_path: &Path, paths: &[PathBuf]) -> Result<RankingOutcome, DocsiftError> {
        let task = TaskInput::load(task_path)?;
        self.rank_documents(&task, paths)
    }

    pub fn rank_documents(&self, task: &TaskInput, paths: &[PathBuf]) -> Result<RankingOutcome, DocsiftError> {
        tracing::info!("🎯 Ranking for {}: {}", task.role(), task.task());

        let mut batch: BatchReport<(String, Vec<Section>)> = BatchReport::default();
        for path in paths {
            match self.process_sections(path) {
                Ok(result) => batch.processed.push(result),
                Err(e) if e.is_recoverable() => batch.skip(path, &e),
                Err(e) => return Err(e),
            }
        }

        let input_documents: Vec<String> = batch.processed.iter().map(|(name, _)| name.clone()).collect();
        let sections: Vec<Section> = batch.processed.into_iter().flat_map(|(_, s)| s).collect();

        // Built once, read-only for every section
        let corpus = sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let document_keywords = extract_keywords(&corpus, self.config.ranking.document_keywords, &[]);
        let keywords = KeywordSet::build(task.task(), Some(task.domain.as_str()), &document_keywords);
        tracing::debug!("🔑 {} ranking term(s): {:?}", keywords.len(), keywords.terms());

        let ranked = self.ranker.rank(&sections, &keywords);
        let metadata = RankingMetadata {
            input_documents,
            persona: task.role().to_string(),
            job_to_be_done: task.task().to_string(),
            processing_timestamp: chrono::Utc::now().to_rfc3339(),
        };

        Ok(RankingOutcome {
            report: RankingReport::new(metadata, &ranked),
            skipped: batch.skipped,
        })
    }
}
