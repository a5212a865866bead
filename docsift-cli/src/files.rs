// Input discovery and output writing for the CLI

use anyhow::{Context, Result};
use docsift_core::SpanSource;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Expand inputs into span files. Directories contribute the files the
/// source supports, sorted by name; explicit files are kept as given.
pub fn collect_span_files(inputs: &[PathBuf], source: &dyn SpanSource) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)
                .with_context(|| format!("Failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && source.supports_file_type(path))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// `<output_dir>/<stem>.json`
pub fn outline_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("{}.json", docsift_core::preprocessors::document_name(input)))
}

/// Pretty JSON, creating parent directories as needed
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
