//! Syntax locations recorded per node and edge
//!
//! The patch engine never sees extraction internals, only these tables.

use ahash::AHashMap;

use super::ast_path::AstPath;
use super::digraph::{EdgeId, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLocation {
    /// The state's config object literal (`None` when it is not one)
    pub config: Option<AstPath>,

    /// The `key: { ... }` pair inside the parent's `states` (`None` for the root)
    pub property: Option<AstPath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLocation {
    /// The transition value: a target string or a transition object
    pub transition: AstPath,

    /// The `EVENT: ...` pair the transition belongs to
    pub property: Option<AstPath>,
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxLocations {
    pub nodes: AHashMap<NodeId, NodeLocation>,
    pub edges: AHashMap<EdgeId, EdgeLocation>,

    /// The root `context` object literal
    pub context: Option<AstPath>,
}

impl SyntaxLocations {
    pub fn node(&self, id: &str) -> Option<&NodeLocation> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLocation> {
        self.edges.get(id)
    }
}
