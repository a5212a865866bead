// Span source abstraction
//
// This module defines the boundary between document parsing (PDF -> spans)
// and structural processing (spans -> outline / sections). Parsing itself is
// an external collaborator; a source only turns its output into a
// SpanDocument.

use crate::error::DocsiftError;
use crate::types::SpanDocument;
use std::path::Path;

/// SpanSource trait - produces positioned spans for one document
///
/// Everything after this point works with Spans and is format-agnostic.
pub trait SpanSource {
    /// Parse already-read content. `name` identifies the document in errors
    /// and in ranking output unless the content names itself.
    fn parse_str(&self, content: &str, name: &str) -> Result<SpanDocument, DocsiftError>;

    /// Read and parse a file. The document name defaults to the file stem.
    fn load(&self, path: &Path) -> Result<SpanDocument, DocsiftError> {
        let name = document_name(path);
        let content = std::fs::read_to_string(path).map_err(|e| DocsiftError::parse(&name, e))?;
        self.parse_str(&content, &name)
    }

    /// Source name for logging
    fn name(&self) -> &str;

    /// Check if the source understands the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}

pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
