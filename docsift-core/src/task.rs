use crate::error::DocsiftError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
}

pub const DEFAULT_DOMAIN: &str = "technical";

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

/// Persona and job description driving a ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
    /// Selects the fixed domain vocabulary added to the ranking terms
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

impl TaskInput {
    /// Parse and validate. Missing or blank role/task is a validation failure.
    pub fn from_json_str(content: &str) -> Result<Self, DocsiftError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| DocsiftError::Validation(format!("malformed task input: {e}")))?;

        require_text(&value, "persona", "role")?;
        require_text(&value, "job_to_be_done", "task")?;

        serde_json::from_value(value).map_err(|e| DocsiftError::Validation(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DocsiftError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DocsiftError::Validation(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn role(&self) -> &str {
        &self.persona.role
    }

    pub fn task(&self) -> &str {
        &self.job_to_be_done.task
    }
}

fn require_text(value: &serde_json::Value, object: &str, field: &str) -> Result<(), DocsiftError> {
    match value.get(object).and_then(|o| o.get(field)).and_then(|f| f.as_str()) {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(DocsiftError::Validation(format!(
            "missing required field: {field} in {object}"
        ))),
    }
}
