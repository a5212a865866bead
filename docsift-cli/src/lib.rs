// All core functionality is in docsift-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod files;

// Re-export core types for convenience
pub use docsift_core::*;

// Re-export CLI utilities
pub use files::{collect_span_files, outline_output_path, write_json};
