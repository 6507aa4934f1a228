//! Recorded routes to syntax nodes
//!
//! A path is a list of child indices (named and anonymous children alike)
//! from an anchor node. Node identity does not survive re-parsing, paths do
//! as long as the text is unchanged.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::features::parsing::infrastructure::syntax::child_index;

/// Where a path starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathAnchor {
    /// The machine call expression
    MachineCall,
    /// The program root, for nodes outside the call (aliased configs)
    Program,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AstPath {
    pub anchor: PathAnchor,
    pub steps: Vec<usize>,
}

impl AstPath {
    /// Path from `call` (or from the program root if `node` is outside it)
    pub fn locate(node: Node<'_>, call: Node<'_>) -> Option<Self> {
        let mut steps = Vec::new();
        let mut current = node;
        loop {
            if current.id() == call.id() {
                steps.reverse();
                return Some(Self {
                    anchor: PathAnchor::MachineCall,
                    steps,
                });
            }
            match current.parent() {
                Some(parent) => {
                    steps.push(child_index(&current)?);
                    current = parent;
                }
                None => {
                    steps.reverse();
                    return Some(Self {
                        anchor: PathAnchor::Program,
                        steps,
                    });
                }
            }
        }
    }

    /// Follow the path on a (possibly re-parsed) tree
    pub fn resolve<'t>(&self, call: Node<'t>, program: Node<'t>) -> Option<Node<'t>> {
        let mut current = match self.anchor {
            PathAnchor::MachineCall => call,
            PathAnchor::Program => program,
        };
        for &step in &self.steps {
            current = current.child(step)?;
        }
        Some(current)
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}
