//! Machine extraction domain models

pub mod ast_path;
pub mod call_site;
pub mod digraph;
pub mod error;
pub mod implementation;
pub mod lexical_tree;
pub mod locations;

pub use ast_path::{AstPath, PathAnchor};
pub use call_site::MachineCallSite;
pub use digraph::{
    child_node_id, edge_base_id, unescape_key_segment, Block, BlockId, Digraph, Edge, EdgeData, EdgeId, HistoryKind,
    Implementations, MachineData, Node, NodeData, NodeId, StateType, ROOT_NODE_ID,
};
pub use error::{ExtractionError, ExtractionErrorKind};
pub use implementation::{
    inline_name, ExpressionPlaceholder, Implementation, JsonItem, EXPRESSION_TAG, EXPRESSION_TAG_VALUE,
};
pub use lexical_tree::{LexicalIndex, LexicalNode, LexicalTree};
pub use locations::{EdgeLocation, NodeLocation, SyntaxLocations};
