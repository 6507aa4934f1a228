//! Match results

use tree_sitter::Node;

use crate::features::parsing::infrastructure::syntax::node_range;
use crate::shared::models::TextRange;

/// A successful match
///
/// `node` is the node the matcher was called with and is what edits target.
/// `value_node` is where the value was actually read from; it differs from
/// `node` when an identifier or a type assertion was looked through.
#[derive(Debug, Clone, Copy)]
pub struct Matched<'t, T> {
    pub node: Node<'t>,
    pub value_node: Node<'t>,
    pub value: T,
}

impl<'t, T> Matched<'t, T> {
    pub fn new(node: Node<'t>, value: T) -> Self {
        Self {
            node,
            value_node: node,
            value,
        }
    }

    /// Range of the outer node (edit target)
    pub fn range(&self) -> TextRange {
        node_range(&self.node)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Matched<'t, U> {
        Matched {
            node: self.node,
            value_node: self.value_node,
            value: f(self.value),
        }
    }

    /// Re-anchor on an outer node, keeping the resolved value node
    pub fn with_outer(mut self, node: Node<'t>) -> Self {
        self.node = node;
        self
    }
}

/// Value of a resolved enum member
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    String(String),
    Number(f64),
}

/// Template literal contents
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateText {
    /// No substitutions: the raw text between the backticks
    Static(String),
    /// Has substitutions: verbatim source of the whole literal
    Interpolated(String),
}
