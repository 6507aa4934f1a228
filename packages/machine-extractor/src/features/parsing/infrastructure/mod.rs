//! Parsing infrastructure (tree-sitter)

pub mod syntax;
pub mod tree_sitter;

pub use self::tree_sitter::TreeSitterParser;
