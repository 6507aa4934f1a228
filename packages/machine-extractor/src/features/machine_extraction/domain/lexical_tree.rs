//! Lexical state tree used for target resolution
//!
//! Arena of nodes addressed by index. Parents and children are indices,
//! so the tree can be walked both ways without shared ownership. Lives for
//! one extraction pass only.

use super::digraph::NodeId;
use crate::shared::models::OrderedMap;

pub type LexicalIndex = usize;

#[derive(Debug, Clone)]
pub struct LexicalNode {
    pub id: NodeId,
    pub parent: Option<LexicalIndex>,
    pub children: OrderedMap<LexicalIndex>,
}

#[derive(Debug, Clone, Default)]
pub struct LexicalTree {
    nodes: Vec<LexicalNode>,
}

impl LexicalTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, id: impl Into<NodeId>) -> LexicalIndex {
        self.push(id.into(), None)
    }

    pub fn add_child(&mut self, parent: LexicalIndex, key: &str, id: impl Into<NodeId>) -> LexicalIndex {
        let index = self.push(id.into(), Some(parent));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(key, index);
        }
        index
    }

    fn push(&mut self, id: NodeId, parent: Option<LexicalIndex>) -> LexicalIndex {
        self.nodes.push(LexicalNode {
            id,
            parent,
            children: OrderedMap::new(),
        });
        self.nodes.len() - 1
    }

    pub fn get(&self, index: LexicalIndex) -> Option<&LexicalNode> {
        self.nodes.get(index)
    }

    pub fn parent(&self, index: LexicalIndex) -> Option<LexicalIndex> {
        self.nodes.get(index)?.parent
    }

    pub fn child(&self, index: LexicalIndex, key: &str) -> Option<LexicalIndex> {
        self.nodes.get(index)?.children.get(key).copied()
    }

    pub fn id(&self, index: LexicalIndex) -> Option<&str> {
        self.nodes.get(index).map(|n| n.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_both_ways() {
        let mut tree = LexicalTree::new();
        let root = tree.add_root("(machine)");
        let a = tree.add_child(root, "a", "(machine).a");
        let b = tree.add_child(a, "b", "(machine).a.b");

        assert_eq!(tree.child(root, "a"), Some(a));
        assert_eq!(tree.child(a, "b"), Some(b));
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.id(b), Some("(machine).a.b"));
        assert_eq!(tree.child(root, "b"), None);
    }
}
