//! Pipeline boundary tests: span files in, JSON artifacts out.
//!
//! Span dumps are written to a temp directory in the PyMuPDF-style layout the
//! JSON source reads, then run through the document processor. Assertions are
//! made on the serialized artifacts, the way downstream consumers see them.

use docsift_core::config::DocsiftConfig;
use docsift_core::model::FEATURE_NAMES;
use docsift_core::ranking::similarity::{Embedder, SemanticScorer};
use docsift_core::ranking::SectionRanker;
use docsift_core::rules::OutlineEngine;
use docsift_core::{DocsiftError, DocumentProcessor, JsonSpanSource, TaskInput};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ============================================================================
// Fixture helpers
// ============================================================================

fn span(text: &str, size: f32, page: u32, y: f32, bold: bool) -> Value {
    json!({
        "text": text,
        "size": size,
        "font": if bold { "Helvetica-Bold" } else { "Helvetica" },
        "flags": 0,
        "page": page,
        "bbox": [72.0, y, 400.0, y + size],
    })
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn report_spans() -> Value {
    json!({
        "document": "annual_report.pdf",
        "pages": [{"number": 1, "width": 612, "height": 792}],
        "spans": [
            span("Annual", 24.0, 1, 50.0, false),
            span("Report", 24.0, 1, 60.0, false),
            span("1. Introduction", 18.0, 1, 200.0, true),
            span("This is body text for the opening.", 10.0, 1, 230.0, false),
            span("More body text follows here.", 10.0, 1, 245.0, false),
            span("1.1 Scope of Work", 14.0, 2, 100.0, true),
            span("Scope body text that is long enough.", 10.0, 2, 130.0, false),
            span("2. Methods", 18.0, 2, 300.0, true),
            span("Methods body text for the section.", 10.0, 2, 330.0, false),
        ]
    })
}

fn travel_spans() -> Value {
    json!([
        span("South of France Guide", 22.0, 1, 50.0, true),
        span("Welcome to the coast.", 10.0, 1, 90.0, false),
        span("Coastal Cities", 14.0, 1, 200.0, true),
        span("Nice is a city destination with a beach and nightlife for friends on a budget.", 10.0, 1, 220.0, false),
        span("Nightlife and Entertainment", 14.0, 2, 100.0, true),
        span("Bars and clubs for group activities, adventure and entertainment together.", 10.0, 2, 120.0, false),
        span("Water Sports", 14.0, 2, 300.0, true),
        span("Try sports and explore activities at the beach, affordable deals.", 10.0, 2, 320.0, false),
        span("Local Cuisine", 14.0, 3, 100.0, true),
        span("Restaurant and food culture, cheap dining.", 10.0, 3, 120.0, false),
        span("Packing Tips", 14.0, 3, 300.0, true),
        span("Packing tips and travel planning guide.", 10.0, 3, 320.0, false),
        span("History", 14.0, 4, 100.0, true),
        span("Old walls and ancient stones.", 10.0, 4, 120.0, false),
    ])
}

fn task_json() -> Value {
    json!({
        "persona": {"role": "Travel Planner"},
        "job_to_be_done": {"task": "Plan a trip of 4 days for a group of 10 college friends."},
        "domain": "tourism"
    })
}

fn processor() -> DocumentProcessor {
    DocumentProcessor::from_config(&DocsiftConfig::default())
}

// ============================================================================
// Outline artifacts
// ============================================================================

mod outline_boundary {
    use super::*;

    #[test]
    fn outline_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "report.json", &report_spans());

        let outline = processor().process_outline(&path).unwrap();
        let value = serde_json::to_value(&outline).unwrap();

        assert_eq!(value["title"], "Annual Report");
        let entries = value["outline"].as_array().unwrap();
        assert!(!entries.is_empty());
        for entry in entries {
            let level = entry["level"].as_str().unwrap();
            assert!(["H1", "H2", "H3"].contains(&level));
            assert!(entry["page"].as_u64().unwrap() >= 1);
        }
        assert!(entries
            .iter()
            .any(|e| e["text"] == "1.1 Scope of Work" && e["level"] == "H2" && e["page"] == 2));
    }

    #[test]
    fn batch_skips_unreadable_documents_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_json(dir.path(), "report.json", &report_spans());
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let missing = dir.path().join("missing.json");
        let travel = write_json(dir.path(), "travel.json", &travel_spans());

        let report = processor().outline_batch(&[good.clone(), broken.clone(), missing.clone(), travel]);

        assert_eq!(report.processed.len(), 2);
        assert_eq!(report.processed[0].path, good);
        assert_eq!(report.processed[1].document, "travel");
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.path.clone()).collect();
        assert_eq!(skipped, vec![broken, missing]);
    }

    #[test]
    fn missing_model_artifact_falls_back_to_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "report.json", &report_spans());

        let mut config = DocsiftConfig::default();
        config.heading.model_path = Some(dir.path().join("absent_model.json").display().to_string());
        let processor = DocumentProcessor::from_config(&config);

        assert!(!processor.engine().classifier().has_learned_model());
        let outline = processor.process_outline(&path).unwrap();
        assert!(outline.outline.iter().any(|e| e.text == "2. Methods"));
    }

    #[test]
    fn learned_model_artifact_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "report.json", &report_spans());

        let weights: Vec<f32> = FEATURE_NAMES
            .iter()
            .map(|n| if *n == "is_bold" { 6.0 } else { 0.0 })
            .collect();
        let model_path = write_json(dir.path(), "model.json", &json!({"weights": weights, "bias": -3.0}));

        let mut config = DocsiftConfig::default();
        config.heading.model_path = Some(model_path.display().to_string());
        let processor = DocumentProcessor::from_config(&config);
        assert!(processor.engine().classifier().has_learned_model());

        let outline = processor.process_outline(&path).unwrap();
        let texts: Vec<_> = outline.outline.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["1. Introduction", "1.1 Scope of Work", "2. Methods"]);
    }

    #[test]
    fn headingless_document_gets_fallback_outline() {
        let dir = tempfile::tempdir().unwrap();
        let plain = json!([
            span("Travel planning notes", 10.0, 1, 100.0, false),
            span("Packing list for the coast", 10.0, 2, 100.0, false),
        ]);
        let path = write_json(dir.path(), "plain.json", &plain);

        let mut config = DocsiftConfig::default();
        config.heading.strategy = docsift_core::config::StrategyKind::RuleCascade;
        let outline = DocumentProcessor::from_config(&config).process_outline(&path).unwrap();
        assert_eq!(outline.outline.len(), 2);
    }
}

// ============================================================================
// Ranking artifacts
// ============================================================================

mod ranking_boundary {
    use super::*;

    #[test]
    fn ranking_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let task = write_json(dir.path(), "task.json", &task_json());
        let travel = write_json(dir.path(), "travel.json", &travel_spans());
        let report_doc = write_json(dir.path(), "report.json", &report_spans());

        let outcome = processor().rank_batch(&task, &[travel, report_doc]).unwrap();
        assert!(outcome.skipped.is_empty());
        let value = serde_json::to_value(&outcome.report).unwrap();

        let metadata = &value["metadata"];
        assert_eq!(metadata["persona"], "Travel Planner");
        assert_eq!(
            metadata["input_documents"],
            json!(["travel", "annual_report.pdf"])
        );
        let timestamp = metadata["processing_timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

        let extracted = value["extracted_sections"].as_array().unwrap();
        assert_eq!(extracted.len(), 5);
        let ranks: Vec<_> = extracted.iter().map(|e| e["importance_rank"].as_u64().unwrap()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

        let keys: HashSet<_> = extracted
            .iter()
            .map(|e| (e["section_title"].to_string(), e["page_number"].as_u64()))
            .collect();
        assert_eq!(keys.len(), extracted.len());

        assert_eq!(extracted[0]["section_title"], "Coastal Cities");
        assert!(extracted.iter().any(|e| e["section_title"] == "Local Cuisine"));

        let analysis = value["subsection_analysis"].as_array().unwrap();
        assert_eq!(analysis.len(), extracted.len());
        assert_eq!(analysis[0]["document"], "travel");
        assert!(analysis[0]["refined_text"].as_str().unwrap().starts_with("Nice is a city"));
    }

    #[test]
    fn invalid_task_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let task = write_json(
            dir.path(),
            "task.json",
            &json!({"persona": {}, "job_to_be_done": {"task": "Plan"}}),
        );
        let travel = write_json(dir.path(), "travel.json", &travel_spans());

        let err = processor().rank_batch(&task, &[travel]).unwrap_err();
        assert!(matches!(err, DocsiftError::Validation(_)));
    }

    #[test]
    fn unreadable_document_is_skipped_during_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let task = write_json(dir.path(), "task.json", &task_json());
        let travel = write_json(dir.path(), "travel.json", &travel_spans());
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{\"text\": 1}]").unwrap();

        let outcome = processor().rank_batch(&task, &[broken.clone(), travel]).unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, broken);
        assert_eq!(outcome.report.metadata.input_documents, vec!["travel".to_string()]);
        assert!(!outcome.report.extracted_sections.is_empty());
    }

    #[test]
    fn task_without_domain_ranks_with_technical_terms() {
        let dir = tempfile::tempdir().unwrap();
        let task = TaskInput::from_json_str(
            r#"{"persona": {"role": "Engineer"}, "job_to_be_done": {"task": "Review the handbook"}}"#,
        )
        .unwrap();
        assert_eq!(task.domain, "technical");

        let manual = write_json(
            dir.path(),
            "manual.json",
            &json!([
                span("Company Picnic", 14.0, 1, 100.0, true),
                span("Sandwiches on the lawn after lunch.", 10.0, 1, 120.0, false),
                span("Platform Overview", 14.0, 2, 100.0, true),
                span("The system architecture and design requirements for the implementation.", 10.0, 2, 120.0, false),
            ]),
        );

        let mut config = DocsiftConfig::default();
        config.ranking.document_keywords = 0;
        config.ranking.semantic_similarity = false;
        let outcome = DocumentProcessor::from_config(&config)
            .rank_documents(&task, &[manual])
            .unwrap();
        assert_eq!(outcome.report.extracted_sections[0].section_title, "Platform Overview");
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("embedding backend unavailable")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn processor_with(semantic: SemanticScorer) -> DocumentProcessor {
        let config = DocsiftConfig::default();
        DocumentProcessor::new_with_dependencies(
            Box::new(JsonSpanSource::new()),
            OutlineEngine::from_config(&config),
            SectionRanker::new(&config.ranking, semantic),
            &config,
        )
    }

    #[test]
    fn embedder_failure_scores_like_no_embedder() {
        let dir = tempfile::tempdir().unwrap();
        let task = write_json(dir.path(), "task.json", &task_json());
        let travel = write_json(dir.path(), "travel.json", &travel_spans());

        let failing = processor_with(SemanticScorer::new(Box::new(FailingEmbedder)))
            .rank_batch(&task, &[travel.clone()])
            .unwrap();
        let disabled = processor_with(SemanticScorer::disabled())
            .rank_batch(&task, &[travel])
            .unwrap();

        let titles = |outcome: &docsift_core::RankingOutcome| -> Vec<String> {
            outcome
                .report
                .extracted_sections
                .iter()
                .map(|s| s.section_title.clone())
                .collect()
        };
        assert_eq!(titles(&failing), titles(&disabled));
    }
}
