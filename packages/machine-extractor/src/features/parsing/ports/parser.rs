//! Parser port (interface)
//!
//! Defines the contract for turning source text into a syntax tree snapshot.

use crate::features::parsing::domain::SourceFile;
use crate::shared::models::Result;

/// Parser trait - abstraction over parsing implementation
pub trait Parser: Send + Sync {
    /// Parse source code into a SourceFile snapshot
    fn parse(&self, source: &str, file_path: &str) -> Result<SourceFile>;

    /// Check if this parser supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool;

    /// Get supported language name
    fn language_name(&self) -> &'static str;
}
