//! Machine patches
//!
//! Callers send untyped `{ op, path, value }` operations against the digraph
//! shape. They are validated into `MachinePatch` before anything touches the
//! source, so an unknown shape fails the batch up front.
//!
//! Recognized paths:
//! - `add    ["nodes", id]`                               value `{ parentId, data: { key } }`
//! - `remove ["nodes", id]`
//! - `replace ["nodes", id, "data", "key"|"initial"|"type"|"history"]`
//! - `add    ["nodes", id, "data", "entry"|"exit", index]`  value action name
//! - `add    ["edges", id, "data", "actions", index]`       value action name
//! - `add|replace ["data", "context", key]`                 value JSON

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{PatchError, PatchResult};
use crate::features::machine_extraction::domain::{
    unescape_key_segment, EdgeId, HistoryKind, NodeId, StateType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(key) => key.parse().ok(),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Untyped patch as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPatch {
    pub op: PatchOp,
    pub path: Vec<PathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl RawPatch {
    pub fn new(op: PatchOp, path: Vec<PathSegment>, value: Option<Value>) -> Self {
        Self { op, path, value }
    }

    pub fn add(path: Vec<PathSegment>, value: Value) -> Self {
        Self::new(PatchOp::Add, path, Some(value))
    }

    pub fn replace(path: Vec<PathSegment>, value: Value) -> Self {
        Self::new(PatchOp::Replace, path, Some(value))
    }

    pub fn remove(path: Vec<PathSegment>) -> Self {
        Self::new(PatchOp::Remove, path, None)
    }

    /// JSON-pointer-like rendering for messages
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|s| match s {
                PathSegment::Index(i) => format!("/{}", i),
                PathSegment::Key(k) => format!("/{}", k),
            })
            .collect()
    }

    fn invalid(&self, reason: impl Into<String>) -> PatchError {
        PatchError::invalid(self.op, self.path_string(), reason)
    }

    fn unsupported(&self) -> PatchError {
        PatchError::unsupported(self.op, self.path_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSlot {
    Entry,
    Exit,
}

impl ActionSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionSlot::Entry => "entry",
            ActionSlot::Exit => "exit",
        }
    }

    /// Older property name accepted for the same slot
    pub fn legacy_name(&self) -> &'static str {
        match self {
            ActionSlot::Entry => "onEntry",
            ActionSlot::Exit => "onExit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Add {
        node_id: NodeId,
        parent_id: NodeId,
        key: String,
    },
    Remove {
        node_id: NodeId,
    },
    ReplaceKey {
        node_id: NodeId,
        key: String,
    },
    ReplaceInitial {
        node_id: NodeId,
        initial: Option<String>,
    },
    ReplaceType {
        node_id: NodeId,
        state_type: StateType,
    },
    ReplaceHistory {
        node_id: NodeId,
        history: Option<HistoryKind>,
    },
    AddAction {
        node_id: NodeId,
        slot: ActionSlot,
        index: usize,
        action: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgePatch {
    AddAction {
        edge_id: EdgeId,
        index: usize,
        action: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataPatch {
    SetContext { key: String, value: Value },
}

/// A validated patch, one variant per digraph section
#[derive(Debug, Clone, PartialEq)]
pub enum MachinePatch {
    Node(NodePatch),
    Edge(EdgePatch),
    Data(DataPatch),
}

impl MachinePatch {
    /// Validate a whole batch; the first invalid patch fails it
    pub fn parse_all(raw: &[RawPatch]) -> PatchResult<Vec<MachinePatch>> {
        raw.iter().map(MachinePatch::try_from).collect()
    }
}

impl TryFrom<RawPatch> for MachinePatch {
    type Error = PatchError;

    fn try_from(raw: RawPatch) -> PatchResult<Self> {
        MachinePatch::try_from(&raw)
    }
}

impl TryFrom<&RawPatch> for MachinePatch {
    type Error = PatchError;

    fn try_from(raw: &RawPatch) -> PatchResult<Self> {
        let keys: Vec<Option<&str>> = raw.path.iter().map(PathSegment::as_key).collect();
        match keys.as_slice() {
            [Some("nodes"), Some(_), ..] => node_patch(raw).map(MachinePatch::Node),
            [Some("edges"), Some(_), ..] => edge_patch(raw).map(MachinePatch::Edge),
            [Some("data"), ..] => data_patch(raw).map(MachinePatch::Data),
            _ => Err(raw.invalid("path does not address a node, an edge or machine data")),
        }
    }
}

fn node_patch(raw: &RawPatch) -> PatchResult<NodePatch> {
    let node_id = key_at(raw, 1)?.to_string();
    let field = match raw.path.get(2).and_then(PathSegment::as_key) {
        Some("data") => raw.path.get(3).and_then(PathSegment::as_key),
        _ => None,
    };

    match (raw.op, raw.path.len(), field) {
        (PatchOp::Add, 2, _) => {
            let value = value_of(raw)?;
            let parent_id = value
                .get("parentId")
                .and_then(Value::as_str)
                .ok_or_else(|| raw.invalid("missing 'parentId'"))?
                .to_string();
            let key = value
                .pointer("/data/key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| {
                    node_id
                        .strip_prefix(parent_id.as_str())
                        .and_then(|rest| rest.strip_prefix('.'))
                        .map(unescape_key_segment)
                })
                .ok_or_else(|| raw.invalid("missing 'data.key'"))?;
            if key.is_empty() {
                return Err(raw.invalid("state key must not be empty"));
            }
            Ok(NodePatch::Add {
                node_id,
                parent_id,
                key,
            })
        }
        (PatchOp::Remove, 2, _) => Ok(NodePatch::Remove { node_id }),
        (PatchOp::Remove, _, _) => Err(raw.unsupported()),
        (PatchOp::Replace, 4, Some("key")) => {
            let key = value_of(raw)?
                .as_str()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| raw.invalid("state key must be a non-empty string"))?;
            Ok(NodePatch::ReplaceKey {
                node_id,
                key: key.to_string(),
            })
        }
        (PatchOp::Replace, 4, Some("initial")) => {
            let initial = optional_string(raw)?;
            Ok(NodePatch::ReplaceInitial { node_id, initial })
        }
        (PatchOp::Replace, 4, Some("type")) => {
            let value = optional_string(raw)?;
            let state_type = match value.as_deref() {
                None => StateType::Normal,
                Some(value) => StateType::parse(value)
                    .ok_or_else(|| raw.invalid(format!("unknown state type '{}'", value)))?,
            };
            Ok(NodePatch::ReplaceType {
                node_id,
                state_type,
            })
        }
        (PatchOp::Replace, 4, Some("history")) => {
            let history = match optional_string(raw)?.as_deref() {
                None => None,
                Some(value) => Some(
                    HistoryKind::parse(value)
                        .ok_or_else(|| raw.invalid(format!("unknown history kind '{}'", value)))?,
                ),
            };
            Ok(NodePatch::ReplaceHistory { node_id, history })
        }
        (PatchOp::Add, 5, Some(slot @ ("entry" | "exit"))) => {
            let slot = if slot == "entry" {
                ActionSlot::Entry
            } else {
                ActionSlot::Exit
            };
            Ok(NodePatch::AddAction {
                node_id,
                slot,
                index: index_at(raw, 4)?,
                action: action_name(raw)?,
            })
        }
        _ => Err(raw.unsupported()),
    }
}

fn edge_patch(raw: &RawPatch) -> PatchResult<EdgePatch> {
    let edge_id = key_at(raw, 1)?.to_string();
    let tail: Vec<Option<&str>> = raw.path[2..].iter().map(PathSegment::as_key).collect();
    match (raw.op, tail.as_slice()) {
        (PatchOp::Add, [Some("data"), Some("actions"), _]) => Ok(EdgePatch::AddAction {
            edge_id,
            index: index_at(raw, 4)?,
            action: action_name(raw)?,
        }),
        _ => Err(raw.unsupported()),
    }
}

fn data_patch(raw: &RawPatch) -> PatchResult<DataPatch> {
    let tail: Vec<Option<&str>> = raw.path[1..].iter().map(PathSegment::as_key).collect();
    match (raw.op, tail.as_slice()) {
        (PatchOp::Add | PatchOp::Replace, [Some("context"), Some(key)]) => Ok(DataPatch::SetContext {
            key: key.to_string(),
            value: value_of(raw)?.clone(),
        }),
        _ => Err(raw.unsupported()),
    }
}

fn key_at(raw: &RawPatch, position: usize) -> PatchResult<&str> {
    raw.path
        .get(position)
        .and_then(PathSegment::as_key)
        .ok_or_else(|| raw.invalid(format!("expected a key at position {}", position)))
}

fn index_at(raw: &RawPatch, position: usize) -> PatchResult<usize> {
    raw.path
        .get(position)
        .and_then(PathSegment::as_index)
        .ok_or_else(|| raw.invalid(format!("expected an index at position {}", position)))
}

fn value_of(raw: &RawPatch) -> PatchResult<&Value> {
    raw.value.as_ref().ok_or_else(|| raw.invalid("missing value"))
}

/// A string, or null / absent for "back to the default"
fn optional_string(raw: &RawPatch) -> PatchResult<Option<String>> {
    match &raw.value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(raw.invalid("expected a string or null")),
    }
}

/// `"name"`, or an action object `{ type: "name" }`
fn action_name(raw: &RawPatch) -> PatchResult<String> {
    let value = value_of(raw)?;
    value
        .as_str()
        .or_else(|| value.get("type").and_then(Value::as_str))
        .or_else(|| value.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| raw.invalid("expected an action name"))
}
