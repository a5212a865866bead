use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Import from docsift-core
use docsift::rules::engine::DebugConfig;
use docsift::{DocsiftConfig, DocumentProcessor, SkippedDocument};

// Import CLI utilities
use docsift::{collect_span_files, outline_output_path, write_json};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Extract document outlines and rank sections for a persona from parsed PDF spans")]
struct Args {
    /// Path to custom config file (YAML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    show_config: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long, global = true)]
    profile: bool,

    /// Trace headings whose text matches these patterns (regex or plain text)
    #[arg(long, global = true)]
    debug_filter: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a title + heading outline for each span file
    Outline {
        /// Span files or directories of span files
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Directory for <name>.json outlines
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// Rank sections across documents for a persona and task
    Rank {
        /// Task input JSON (persona.role, job_to_be_done.task)
        #[arg(short, long)]
        task: PathBuf,

        /// Span files or directories of span files
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Ranking output path
        #[arg(short, long, default_value = "ranking_output.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    println!("🦀 Docsift Outline & Ranking");

    // A config file that fails to load falls back to defaults
    let config = match args.config.as_deref() {
        Some(config_path) => match DocsiftConfig::load_from_file(config_path) {
            Ok(config) => {
                println!("📋 Loaded config from: {}", config_path);
                config
            }
            Err(e) => {
                eprintln!("⚠️  Failed to load config from {} ({}), using defaults", config_path, e);
                DocsiftConfig::default()
            }
        },
        None => {
            println!("📋 Using default config");
            DocsiftConfig::default()
        }
    };

    if args.show_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let Some(command) = args.command else {
        show_help();
        return Ok(());
    };

    let mut processor = DocumentProcessor::from_config(&config);
    processor.set_profiling(args.profile);
    if !args.debug_filter.is_empty() {
        processor.set_debug_config(DebugConfig::new(true, args.debug_filter.clone()));
    }

    match command {
        Command::Outline { input, output_dir } => run_outline(&processor, &input, &output_dir),
        Command::Rank { task, input, output } => run_rank(&processor, &task, &input, &output),
    }
}

fn run_outline(processor: &DocumentProcessor, inputs: &[PathBuf], output_dir: &Path) -> Result<()> {
    let files = collect_span_files(inputs, processor.source())?;
    println!("📄 Found {} span file(s) to process", files.len());

    let report = processor.outline_batch(&files);
    for result in &report.processed {
        let output_path = outline_output_path(output_dir, &result.path);
        write_json(&output_path, &result.outline)?;
        println!(
            "💾 {} → {} ({} headings)",
            result.document,
            output_path.display(),
            result.outline.outline.len()
        );
    }

    print_skipped(&report.skipped);
    println!(
        "✅ Successfully processed {}/{} documents",
        report.processed.len(),
        files.len()
    );
    Ok(())
}

fn run_rank(processor: &DocumentProcessor, task: &Path, inputs: &[PathBuf], output: &Path) -> Result<()> {
    let files = collect_span_files(inputs, processor.source())?;
    println!("📄 Ranking sections from {} span file(s)", files.len());

    let outcome = processor
        .rank_batch(task, &files)
        .with_context(|| format!("Ranking failed for task {}", task.display()))?;

    print_skipped(&outcome.skipped);
    for section in &outcome.report.extracted_sections {
        println!(
            "   {}. {} ({}, page {})",
            section.importance_rank, section.section_title, section.document, section.page_number
        );
    }

    write_json(output, &outcome.report)?;
    println!("💾 Ranking saved to: {}", output.display());
    Ok(())
}

fn print_skipped(skipped: &[SkippedDocument]) {
    for doc in skipped {
        eprintln!("⚠️  Skipped {}: {}", doc.path.display(), doc.reason);
    }
}

fn show_help() {
    println!("\n📋 Commands:");
    println!("  outline -i <files|dirs> [-o <dir>]        Write <name>.json outlines");
    println!("  rank -t <task.json> -i <files|dirs> [-o]  Write a ranked section report");

    println!("\n⚙️  Options:");
    println!("  --config <path>         Load custom config file (YAML)");
    println!("  --show-config           Print the effective config and exit");
    println!("  --profile               Print per-step timings");
    println!("  --debug-filter <pat>    Trace matching headings through the pipeline");

    println!("\n📝 Usage Examples:");
    println!("  docsift outline -i spans/ -o outlines/");
    println!("  docsift rank -t input/task.json -i spans/ -o output/ranking.json");
    println!("  RUST_LOG=docsift_core=debug docsift outline -i report.json");
}
