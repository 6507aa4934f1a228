//! Digraph model of one machine
//!
//! Nodes are states, edges are transitions, blocks are invoked actors.
//! Ids are derived from ancestor keys so they survive re-extraction of an
//! edited file.

use serde::{Deserialize, Serialize};

use super::implementation::{Implementation, JsonItem};
use crate::shared::models::OrderedMap;

pub type NodeId = String;
pub type EdgeId = String;
pub type BlockId = String;

/// Id of the root state
pub const ROOT_NODE_ID: &str = "(machine)";

/// Id of a child state: `<parent>.<key>`
///
/// `.`, `#` and `\` inside the key are escaped with `\`, so a key like
/// `'a.b'` never shares an id with the nested path `a` → `b`.
pub fn child_node_id(parent_id: &str, key: &str) -> NodeId {
    let mut id = String::with_capacity(parent_id.len() + key.len() + 1);
    id.push_str(parent_id);
    id.push('.');
    for c in key.chars() {
        if matches!(c, '.' | '#' | '\\') {
            id.push('\\');
        }
        id.push(c);
    }
    id
}

/// Inverse of the key escaping in `child_node_id`
pub fn unescape_key_segment(segment: &str) -> String {
    let mut key = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => key.extend(chars.next()),
            c => key.push(c),
        }
    }
    key
}

/// Base id of a transition: `<source>#<event>[<index>]`
pub fn edge_base_id(source_id: &str, event: &str, index: usize) -> EdgeId {
    format!("{}#{}[{}]", source_id, event, index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    #[default]
    Normal,
    History,
    Final,
    Parallel,
}

impl StateType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" | "atomic" | "compound" => Some(StateType::Normal),
            "history" => Some(StateType::History),
            "final" => Some(StateType::Final),
            "parallel" => Some(StateType::Parallel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StateType::Normal => "normal",
            StateType::History => "history",
            StateType::Final => "final",
            StateType::Parallel => "parallel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    #[default]
    Shallow,
    Deep,
}

impl HistoryKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "shallow" => Some(HistoryKind::Shallow),
            "deep" => Some(HistoryKind::Deep),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Shallow => "shallow",
            HistoryKind::Deep => "deep",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub key: String,

    /// Explicit `id` property, addressable as `#id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,

    #[serde(rename = "type")]
    pub state_type: StateType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub tags: Vec<String>,
    pub entry: Vec<Implementation>,
    pub exit: Vec<Implementation>,

    /// Blocks of the actors invoked by this state
    pub invoke: Vec<BlockId>,
}

impl NodeData {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,

    /// Child key → child id, in source order
    pub children: OrderedMap<NodeId>,

    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Event name; `""` for eventless (`always`) transitions
    pub event_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<Implementation>,

    pub actions: Vec<Implementation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reenter: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,

    /// Target strings as written
    pub targets: Vec<String>,

    /// Node ids the targets resolved to
    pub resolved_targets: Vec<NodeId>,

    pub data: EdgeData,
}

impl Edge {
    /// Transition without targets
    pub fn is_targetless(&self) -> bool {
        self.targets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,

    /// State that invokes the actor
    pub parent_id: NodeId,

    /// Actor implementation name
    pub src: String,

    /// Invocation id (explicit `id` or generated)
    pub invoke_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Implementations {
    pub actions: OrderedMap<Implementation>,
    pub actors: OrderedMap<Implementation>,
    pub guards: OrderedMap<Implementation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MachineData {
    pub context: OrderedMap<JsonItem>,
}

/// Graph of one machine definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digraph {
    pub root: NodeId,
    pub nodes: OrderedMap<Node>,
    pub edges: OrderedMap<Edge>,
    pub blocks: OrderedMap<Block>,
    pub implementations: Implementations,
    pub data: MachineData,
}

impl Default for Digraph {
    fn default() -> Self {
        Self {
            root: ROOT_NODE_ID.to_string(),
            nodes: OrderedMap::new(),
            edges: OrderedMap::new(),
            blocks: OrderedMap::new(),
            implementations: Implementations::default(),
            data: MachineData::default(),
        }
    }
}

impl Digraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    /// Follow child keys from the root
    pub fn node_at(&self, keys: &[&str]) -> Option<&Node> {
        let mut node = self.root_node()?;
        for key in keys {
            let child_id = node.children.get(key)?;
            node = self.nodes.get(child_id)?;
        }
        Some(node)
    }

    /// Edges leaving `source`, in extraction order
    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| e.source == source)
    }

    /// Edges leaving `source` for `event`, in alternative order
    pub fn transitions<'a>(&'a self, source: &'a str, event: &'a str) -> Vec<&'a Edge> {
        self.edges_from(source)
            .filter(|e| e.data.event_type == event)
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
