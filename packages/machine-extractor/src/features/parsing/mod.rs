//! Parsing Feature
//!
//! The host syntax-tree front end. Source text goes in, an immutable
//! tree-sitter snapshot comes out; every other feature only reads trees.
//!
//! ## Structure
//! - `domain/` - SourceFile snapshot
//! - `ports/` - Parser trait
//! - `infrastructure/` - TreeSitterParser, node kinds, node helpers

pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports
pub use domain::{SourceFile, SourceLanguage};
pub use infrastructure::TreeSitterParser;
pub use ports::Parser;
