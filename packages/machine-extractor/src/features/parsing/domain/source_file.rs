//! Parsed source file snapshot
//!
//! Immutable after construction: the text, its syntax tree and a content
//! fingerprint. A changed file is a new snapshot, never a mutated one.

use tree_sitter::{Node, Tree};

use crate::shared::models::{LineIndex, Span, TextRange};

/// Grammar the file was parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Tsx => "tsx",
        }
    }
}

/// One parsed file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub text: String,
    pub tree: Tree,
    pub language: SourceLanguage,

    /// blake3 hash of `text`
    pub fingerprint: blake3::Hash,
}

impl SourceFile {
    pub fn new(file_name: String, text: String, tree: Tree, language: SourceLanguage) -> Self {
        let fingerprint = blake3::hash(text.as_bytes());
        Self {
            file_name,
            text,
            tree,
            language,
            fingerprint,
        }
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`
    pub fn text_of(&self, node: &Node) -> &str {
        self.text.get(node.byte_range()).unwrap_or("")
    }

    pub fn text_in(&self, range: TextRange) -> &str {
        self.text.get(range.start..range.end).unwrap_or("")
    }

    /// Whether the tree contains syntax errors
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }

    /// Span of `node` (1-indexed lines, 0-indexed columns)
    pub fn span_of(node: &Node) -> Span {
        let start = node.start_position();
        let end = node.end_position();
        Span::new(
            start.row as u32 + 1,
            start.column as u32,
            end.row as u32 + 1,
            end.column as u32,
        )
    }

    pub fn same_content(&self, other: &SourceFile) -> bool {
        self.fingerprint == other.fingerprint
    }
}
