//! Extraction context passed to extractors
//!
//! Call-scoped accumulator: the digraph under construction, errors, the id
//! registry, the lexical tree and recorded syntax locations. Created per
//! machine, consumed by `finish`.

use ahash::AHashMap;
use tree_sitter::Node;

use crate::config::ExtractorConfig;
use crate::features::machine_extraction::domain::{
    AstPath, Digraph, Edge, EdgeId, EdgeLocation, ExtractionError, ExtractionErrorKind,
    Implementation, LexicalIndex, LexicalTree, NodeId, SyntaxLocations,
};
use crate::features::parsing::SourceFile;
use crate::shared::models::Span;

pub struct ExtractionContext<'t> {
    pub file: &'t SourceFile,
    pub config: &'t ExtractorConfig,

    /// The machine call expression
    pub call: Node<'t>,

    pub digraph: Digraph,
    pub errors: Vec<ExtractionError>,
    pub lexical_tree: LexicalTree,
    pub locations: SyntaxLocations,

    /// Node id → lexical tree index
    node_index: AHashMap<NodeId, LexicalIndex>,

    /// Explicit `id` property → lexical tree index
    explicit_ids: AHashMap<String, LexicalIndex>,
}

impl<'t> ExtractionContext<'t> {
    pub fn new(file: &'t SourceFile, config: &'t ExtractorConfig, call: Node<'t>) -> Self {
        Self {
            file,
            config,
            call,
            digraph: Digraph::default(),
            errors: Vec::new(),
            lexical_tree: LexicalTree::new(),
            locations: SyntaxLocations::default(),
            node_index: AHashMap::new(),
            explicit_ids: AHashMap::new(),
        }
    }

    pub fn text(&self, node: &Node) -> &'t str {
        self.file.text_of(node)
    }

    pub fn path(&self, node: Node<'_>) -> Option<AstPath> {
        AstPath::locate(node, self.call)
    }

    /// Record a recoverable error located at `node`
    pub fn error(&mut self, kind: ExtractionErrorKind, node: Option<&Node>) {
        let location: Option<Span> = node.map(SourceFile::span_of);
        self.errors.push(ExtractionError::new(kind, location));
    }

    /// Add a state to the lexical tree
    pub fn register_node(
        &mut self,
        id: &str,
        parent: Option<(LexicalIndex, &str)>,
    ) -> LexicalIndex {
        let index = match parent {
            Some((parent_index, key)) => self.lexical_tree.add_child(parent_index, key, id),
            None => self.lexical_tree.add_root(id),
        };
        self.node_index.insert(id.to_string(), index);
        index
    }

    pub fn lexical_index(&self, node_id: &str) -> Option<LexicalIndex> {
        self.node_index.get(node_id).copied()
    }

    /// Register `#id`. The first registration of an id wins.
    pub fn register_explicit_id(&mut self, explicit_id: &str, index: LexicalIndex) {
        self.explicit_ids
            .entry(explicit_id.to_string())
            .or_insert(index);
    }

    pub fn explicit_id(&self, explicit_id: &str) -> Option<LexicalIndex> {
        self.explicit_ids.get(explicit_id).copied()
    }

    /// `base`, or `base~<n>` if `base` is taken
    pub fn unique_edge_id(&self, base: &str) -> EdgeId {
        if !self.digraph.edges.contains_key(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}~{}", base, n))
            .find(|candidate| !self.digraph.edges.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn add_edge(&mut self, edge: Edge, transition: Node<'_>, property: Option<Node<'_>>) {
        if let Some(path) = self.path(transition) {
            let location = EdgeLocation {
                transition: path,
                property: property.and_then(|p| self.path(p)),
            };
            self.locations.edges.insert(edge.id.clone(), location);
        }
        self.digraph.edges.insert(edge.id.clone(), edge);
    }

    pub fn register_action(&mut self, implementation: &Implementation) {
        register(&mut self.digraph.implementations.actions, implementation);
    }

    pub fn register_guard(&mut self, implementation: &Implementation) {
        register(&mut self.digraph.implementations.guards, implementation);
    }

    pub fn register_actor(&mut self, implementation: &Implementation) {
        register(&mut self.digraph.implementations.actors, implementation);
    }

    pub fn finish(self) -> (Digraph, Vec<ExtractionError>, SyntaxLocations) {
        (self.digraph, self.errors, self.locations)
    }
}

fn register(
    registry: &mut crate::shared::models::OrderedMap<Implementation>,
    implementation: &Implementation,
) {
    if !registry.contains_key(&implementation.name) {
        registry.insert(implementation.name.clone(), implementation.clone());
    }
}
