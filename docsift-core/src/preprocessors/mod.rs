//! Span Sources
//!
//! This module provides the boundary between the external document parser
//! and the structural pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Document (PDF)
//!     ↓
//! [External parser]
//!     ↓
//! Span dump (JSON)
//!     ↓
//! [SpanSource]
//!     ↓
//! SpanDocument
//!     ↓
//! [Outline engine / Section segmenter]
//! ```
//!
//! ## Available Sources
//!
//! - `JsonSpanSource` - PyMuPDF-style span dumps

pub mod json;
pub mod preprocessor;

// Re-export main types
pub use json::JsonSpanSource;
pub use preprocessor::{document_name, SpanSource};
