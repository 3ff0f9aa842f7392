// Diagnostic utilities for user-facing, non-fatal problems

pub mod builder;
pub mod types;

pub use builder::{DiagnosticBuilder, GrokDiagnostics};
pub use types::*;
