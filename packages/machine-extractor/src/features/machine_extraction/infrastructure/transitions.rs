//! Transition extraction
//!
//! A transition value is a target string, a transition object, or an array
//! of those (guarded alternatives, in evaluation order). Each alternative
//! becomes one edge; alternatives share the event name.

use tracing::debug;
use tree_sitter::Node;

use super::actions::extract_actions;
use super::literals::{literal_object, match_array, match_object, placeholder};
use crate::features::machine_extraction::domain::{
    edge_base_id, inline_name, Edge, EdgeData, ExtractionErrorKind, Implementation, JsonItem,
};
use crate::features::machine_extraction::ports::ExtractionContext;
use crate::features::matching::{match_boolean, match_string, match_template, TemplateText};
use crate::features::parsing::infrastructure::syntax::{
    has_only_plain_properties, named_children, object_properties,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;

/// Extract every alternative of one event
pub fn extract_transitions<'t>(
    ctx: &mut ExtractionContext<'t>,
    source_id: &str,
    event: &str,
    value: Node<'t>,
    property: Option<Node<'t>>,
) {
    let alternatives = match match_array(value, ctx.file) {
        Some(array) => named_children(&array),
        None => vec![value],
    };
    for (index, alternative) in alternatives.into_iter().enumerate() {
        extract_transition(ctx, source_id, event, alternative, property, index);
    }
}

/// Extract an `on`-style map: one event per property
pub fn extract_event_map<'t>(
    ctx: &mut ExtractionContext<'t>,
    source_id: &str,
    value: Node<'t>,
    event_name: impl Fn(&str) -> String,
) {
    let Some(object) = match_object(value, ctx.file) else {
        ctx.error(ExtractionErrorKind::TransitionPropertyUnhandled, Some(&value));
        return;
    };
    for (key, pair, transition) in object_properties(&object, &ctx.file.text) {
        extract_transitions(ctx, source_id, &event_name(&key), transition, Some(pair));
    }
}

fn extract_transition<'t>(
    ctx: &mut ExtractionContext<'t>,
    source_id: &str,
    event: &str,
    node: Node<'t>,
    property: Option<Node<'t>>,
    index: usize,
) {
    let id = ctx.unique_edge_id(&edge_base_id(source_id, event, index));
    let mut edge = Edge {
        id,
        source: source_id.to_string(),
        targets: Vec::new(),
        resolved_targets: Vec::new(),
        data: EdgeData {
            event_type: event.to_string(),
            ..Default::default()
        },
    };

    let location = if let Some(target) = target_string(node, ctx) {
        edge.targets.push(target);
        node
    } else if let Some(object) = match_object(node, ctx.file) {
        read_transition_object(ctx, &mut edge, object);
        object
    } else if matches!(node.kind(), node_kinds::UNDEFINED | node_kinds::NULL) {
        // Forbidden transition: no targets, no actions
        node
    } else {
        ctx.error(ExtractionErrorKind::TransitionPropertyUnhandled, Some(&node));
        return;
    };

    debug!(edge = %edge.id, targets = edge.targets.len(), "transition extracted");
    ctx.add_edge(edge, location, property);
}

fn target_string(node: Node<'_>, ctx: &ExtractionContext<'_>) -> Option<String> {
    if let Some(m) = match_string(node, ctx.file) {
        return Some(m.value);
    }
    match match_template(node, ctx.file)?.value {
        TemplateText::Static(text) => Some(text),
        TemplateText::Interpolated(_) => None,
    }
}

fn read_transition_object<'t>(ctx: &mut ExtractionContext<'t>, edge: &mut Edge, object: Node<'t>) {
    for (key, _, value) in object_properties(&object, &ctx.file.text) {
        match key.as_str() {
            "target" => edge.targets = read_targets(ctx, value),
            "actions" => {
                let actions = extract_actions(ctx, value, &edge.id, "actions");
                edge.data.actions.extend(actions);
            }
            "guard" | "cond" => {
                edge.data.guard = Some(extract_guard(ctx, value, &edge.id));
            }
            "description" => {
                edge.data.description = match_string(value, ctx.file).map(|m| m.value);
            }
            "reenter" => {
                edge.data.reenter = match_boolean(value, ctx.file).map(|m| m.value);
            }
            "internal" => {
                edge.data.reenter = match_boolean(value, ctx.file).map(|m| !m.value);
            }
            _ => {}
        }
    }
}

fn read_targets<'t>(ctx: &mut ExtractionContext<'t>, value: Node<'t>) -> Vec<String> {
    if matches!(value.kind(), node_kinds::UNDEFINED | node_kinds::NULL) {
        return Vec::new();
    }
    let items = match match_array(value, ctx.file) {
        Some(array) => named_children(&array),
        None => vec![value],
    };
    let mut targets = Vec::new();
    for item in items {
        match target_string(item, ctx) {
            Some(target) => targets.push(target),
            None => ctx.error(ExtractionErrorKind::TransitionPropertyUnhandled, Some(&item)),
        }
    }
    targets
}

/// Guard reference: a name, `{ type, params }`, or inline code
pub fn extract_guard<'t>(ctx: &mut ExtractionContext<'t>, value: Node<'t>, owner_id: &str) -> Implementation {
    let guard = if let Some(name) = match_string(value, ctx.file) {
        Implementation::named(name.value)
    } else if let Some(guard) = parameterized(ctx, value) {
        guard
    } else {
        Implementation::inline(inline_name(owner_id, "guard", 0), ctx.text(&value))
    };
    ctx.register_guard(&guard);
    guard
}

/// `{ type: 'name', params: { ... } }`
pub fn parameterized<'t>(ctx: &ExtractionContext<'t>, value: Node<'t>) -> Option<Implementation> {
    let object = match_object(value, ctx.file)?;
    let properties = object_properties(&object, &ctx.file.text);
    let (_, _, type_value) = properties.iter().find(|(k, _, _)| k == "type")?;
    let name = match_string(*type_value, ctx.file)?.value;

    let params = properties.iter().find(|(k, _, _)| k == "params").map(|(_, _, p)| {
        if p.kind() == node_kinds::OBJECT && has_only_plain_properties(p) {
            JsonItem::Object(literal_object(*p, ctx.file))
        } else {
            placeholder(p, ctx.file)
        }
    });

    Some(match params {
        Some(params) => Implementation::with_data(name, params),
        None => Implementation::named(name),
    })
}
