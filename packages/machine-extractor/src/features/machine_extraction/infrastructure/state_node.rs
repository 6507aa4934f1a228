//! State node extractor
//!
//! Recursive walk over one state config object literal and its nested
//! `states`. Unknown properties are ignored. Malformed known properties are
//! recorded as errors and the state keeps defaults for them.

use tracing::warn;
use tree_sitter::Node;

use super::actions::extract_actions;
use super::literals::{literal_object, match_array, match_object};
use super::transitions::{extract_event_map, extract_transitions, parameterized};
use crate::features::machine_extraction::domain::{
    child_node_id, inline_name, Block, BlockId, ExtractionErrorKind, HistoryKind, Implementation,
    LexicalIndex, Node as StateNode, NodeData, NodeId, NodeLocation, StateType, ROOT_NODE_ID,
};
use crate::features::machine_extraction::ports::ExtractionContext;
use crate::features::matching::{match_boolean, match_string};
use crate::features::parsing::infrastructure::syntax::{named_children, object_properties};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::shared::models::OrderedMap;

/// Where a child state hangs in its parent
#[derive(Debug, Clone)]
pub struct ParentLink<'t> {
    pub id: NodeId,
    pub lexical: LexicalIndex,
    pub key: String,

    /// The `key: { ... }` pair in the parent's `states`
    pub property: Node<'t>,
}

pub fn after_event(delay: &str, node_id: &str) -> String {
    format!("xstate.after.{}.{}", delay, node_id)
}

pub fn done_state_event(node_id: &str) -> String {
    format!("xstate.done.state.{}", node_id)
}

pub fn done_actor_event(invoke_id: &str) -> String {
    format!("xstate.done.actor.{}", invoke_id)
}

pub fn error_actor_event(invoke_id: &str) -> String {
    format!("xstate.error.actor.{}", invoke_id)
}

/// Block id (and default invoke id) of the `index`-th invocation of a state
pub fn invocation_id(node_id: &str, index: usize) -> BlockId {
    format!("{}:invocation[{}]", node_id, index)
}

/// Extract a state and its descendants; returns the state's id
pub fn extract_state_node<'t>(
    ctx: &mut ExtractionContext<'t>,
    value: Option<Node<'t>>,
    parent: Option<ParentLink<'t>>,
) -> NodeId {
    let (id, key) = match &parent {
        Some(link) => (child_node_id(&link.id, &link.key), link.key.clone()),
        None => (ROOT_NODE_ID.to_string(), ROOT_NODE_ID.to_string()),
    };
    let lexical = ctx.register_node(&id, parent.as_ref().map(|p| (p.lexical, p.key.as_str())));

    let object = value.and_then(|v| match_object(v, ctx.file));
    let location = NodeLocation {
        config: object.and_then(|o| ctx.path(o)),
        property: parent.as_ref().and_then(|p| ctx.path(p.property)),
    };
    ctx.locations.nodes.insert(id.clone(), location);

    let mut data = NodeData::new(key);
    let Some(object) = object else {
        let kind = match parent {
            Some(_) => ExtractionErrorKind::StatesPropertyUnhandled,
            None => ExtractionErrorKind::MachineConfigMissing,
        };
        let at = value.unwrap_or(ctx.call);
        ctx.error(kind, Some(&at));
        insert_node(ctx, &id, parent.as_ref(), data);
        return id;
    };

    let mut states = None;
    for (name, pair, property) in object_properties(&object, &ctx.file.text) {
        match name.as_str() {
            "id" => {
                if let Some(m) = match_string(property, ctx.file) {
                    ctx.register_explicit_id(&m.value, lexical);
                    data.id = Some(m.value);
                }
            }
            "initial" => match match_string(property, ctx.file) {
                Some(m) => data.initial = Some(m.value),
                None if property.kind() == node_kinds::UNDEFINED => {}
                None => ctx.error(ExtractionErrorKind::InitialPropertyUnhandled, Some(&property)),
            },
            "type" => read_state_type(ctx, property, &mut data),
            "history" => read_history(ctx, property, &mut data),
            "description" => data.description = match_string(property, ctx.file).map(|m| m.value),
            "tags" => data.tags = read_tags(ctx, property),
            "entry" | "onEntry" => {
                let actions = extract_actions(ctx, property, &id, "entry");
                data.entry.extend(actions);
            }
            "exit" | "onExit" => {
                let actions = extract_actions(ctx, property, &id, "exit");
                data.exit.extend(actions);
            }
            "on" => extract_event_map(ctx, &id, property, |event| event.to_string()),
            "always" => extract_transitions(ctx, &id, "", property, Some(pair)),
            "after" => extract_event_map(ctx, &id, property, |delay| after_event(delay, &id)),
            "onDone" => extract_transitions(ctx, &id, &done_state_event(&id), property, Some(pair)),
            "invoke" => {
                let blocks = extract_invocations(ctx, &id, property);
                data.invoke.extend(blocks);
            }
            "context" if parent.is_none() => extract_context(ctx, property),
            "states" => states = Some(property),
            _ => {}
        }
    }

    // `history: 'deep'` without `type` still declares a history state
    if data.history.is_some() && data.state_type == StateType::Normal {
        data.state_type = StateType::History;
    }

    insert_node(ctx, &id, parent.as_ref(), data);

    if let Some(states) = states {
        let children = extract_children(ctx, &id, lexical, states);
        if let Some(node) = ctx.digraph.nodes.get_mut(&id) {
            node.children = children;
        }
    }

    id
}

fn insert_node(ctx: &mut ExtractionContext<'_>, id: &str, parent: Option<&ParentLink<'_>>, data: NodeData) {
    let node = StateNode {
        id: id.to_string(),
        parent_id: parent.map(|p| p.id.clone()),
        children: OrderedMap::new(),
        data,
    };
    ctx.digraph.nodes.insert(id, node);
}

fn extract_children<'t>(
    ctx: &mut ExtractionContext<'t>,
    parent_id: &str,
    lexical: LexicalIndex,
    states: Node<'t>,
) -> OrderedMap<NodeId> {
    let mut children = OrderedMap::new();
    let Some(object) = match_object(states, ctx.file) else {
        ctx.error(ExtractionErrorKind::StatesPropertyUnhandled, Some(&states));
        return children;
    };

    for (key, pair, value) in object_properties(&object, &ctx.file.text) {
        if children.contains_key(&key) {
            warn!(parent = parent_id, key = %key, "duplicate state key ignored");
            ctx.error(ExtractionErrorKind::StatesPropertyUnhandled, Some(&pair));
            continue;
        }
        let link = ParentLink {
            id: parent_id.to_string(),
            lexical,
            key: key.clone(),
            property: pair,
        };
        let child_id = extract_state_node(ctx, Some(value), Some(link));
        children.insert(key, child_id);
    }
    children
}

fn read_state_type(ctx: &mut ExtractionContext<'_>, property: Node<'_>, data: &mut NodeData) {
    let value = match_string(property, ctx.file).map(|m| m.value);
    match value.as_deref().and_then(StateType::parse) {
        Some(state_type) => data.state_type = state_type,
        None => {
            let value = value.unwrap_or_else(|| ctx.text(&property).to_string());
            ctx.error(ExtractionErrorKind::StateTypeUnhandled { value }, Some(&property));
        }
    }
}

fn read_history(ctx: &mut ExtractionContext<'_>, property: Node<'_>, data: &mut NodeData) {
    if let Some(m) = match_string(property, ctx.file) {
        if let Some(kind) = HistoryKind::parse(&m.value) {
            data.history = Some(kind);
            return;
        }
    }
    // Legacy `history: true` is a deep history
    if let Some(m) = match_boolean(property, ctx.file) {
        if m.value {
            data.history = Some(HistoryKind::Deep);
        }
        return;
    }
    let value = ctx.text(&property).to_string();
    ctx.error(ExtractionErrorKind::StateTypeUnhandled { value }, Some(&property));
}

fn read_tags(ctx: &ExtractionContext<'_>, property: Node<'_>) -> Vec<String> {
    let items = match match_array(property, ctx.file) {
        Some(array) => named_children(&array),
        None => vec![property],
    };
    items
        .into_iter()
        .filter_map(|item| match_string(item, ctx.file).map(|m| m.value))
        .collect()
}

/// `invoke: { ... }` or `invoke: [{ ... }, ...]`; returns the block ids
fn extract_invocations<'t>(ctx: &mut ExtractionContext<'t>, node_id: &str, value: Node<'t>) -> Vec<BlockId> {
    let items = match match_array(value, ctx.file) {
        Some(array) => named_children(&array),
        None => vec![value],
    };

    let mut blocks = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let Some(object) = match_object(item, ctx.file) else {
            ctx.error(ExtractionErrorKind::InvokePropertyUnhandled, Some(&item));
            continue;
        };
        let block_id = invocation_id(node_id, index);
        let properties = object_properties(&object, &ctx.file.text);

        let invoke_id = properties
            .iter()
            .find(|(k, _, _)| k == "id")
            .and_then(|(_, _, v)| match_string(*v, ctx.file))
            .map(|m| m.value)
            .unwrap_or_else(|| block_id.clone());

        let src = match properties.iter().find(|(k, _, _)| k == "src") {
            Some((_, _, src)) => {
                let actor = if let Some(m) = match_string(*src, ctx.file) {
                    Implementation::named(m.value)
                } else if let Some(actor) = parameterized(ctx, *src) {
                    actor
                } else {
                    Implementation::inline(inline_name(node_id, "invoke", index), ctx.text(src))
                };
                ctx.register_actor(&actor);
                actor.name
            }
            None => {
                ctx.error(ExtractionErrorKind::InvokePropertyUnhandled, Some(&object));
                String::new()
            }
        };

        for (key, pair, transition) in &properties {
            let event = match key.as_str() {
                "onDone" => done_actor_event(&invoke_id),
                "onError" => error_actor_event(&invoke_id),
                _ => continue,
            };
            extract_transitions(ctx, node_id, &event, *transition, Some(*pair));
        }

        ctx.digraph.blocks.insert(
            block_id.clone(),
            Block {
                id: block_id.clone(),
                parent_id: node_id.to_string(),
                src,
                invoke_id,
            },
        );
        blocks.push(block_id);
    }
    blocks
}

/// Root `context` object; per-property capture like `assign`
fn extract_context<'t>(ctx: &mut ExtractionContext<'t>, value: Node<'t>) {
    let Some(object) = match_object(value, ctx.file) else {
        ctx.error(ExtractionErrorKind::ContextPropertyUnhandled, Some(&value));
        return;
    };
    ctx.locations.context = ctx.path(object);
    ctx.digraph.data.context = literal_object(object, ctx.file);
}
