use thiserror::Error;

/// Failure taxonomy for the outline and ranking pipelines.
///
/// Only `Validation` is allowed to abort a run. `Parse` skips a single
/// document, `Collaborator` degrades to a neutral value at the call boundary,
/// and `EmptyResult` triggers the fallback outline.
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("failed to read document '{document}': {reason}")]
    Parse { document: String, reason: String },

    #[error("invalid task input: {0}")]
    Validation(String),

    #[error("{collaborator} failed: {reason}")]
    Collaborator {
        collaborator: &'static str,
        reason: String,
    },

    #[error("no headings detected in '{document}'")]
    EmptyResult { document: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DocsiftError {
    pub fn parse(document: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            document: document.into(),
            reason: reason.to_string(),
        }
    }

    pub fn collaborator(collaborator: &'static str, reason: impl ToString) -> Self {
        Self::Collaborator {
            collaborator,
            reason: reason.to_string(),
        }
    }

    /// Whether a batch may continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_aborts() {
        assert!(DocsiftError::parse("a.pdf", "truncated").is_recoverable());
        assert!(DocsiftError::collaborator("embedder", "oom").is_recoverable());
        assert!(!DocsiftError::Validation("missing role".into()).is_recoverable());
    }

    #[test]
    fn messages_name_the_document() {
        let err = DocsiftError::parse("report.pdf", "unexpected end of file");
        assert_eq!(
            err.to_string(),
            "failed to read document 'report.pdf': unexpected end of file"
        );
    }
}
