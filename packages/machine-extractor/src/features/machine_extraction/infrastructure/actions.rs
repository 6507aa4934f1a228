//! Action extractors
//!
//! An action value is a name (`'doStuff'`), an action-creator call, inline
//! code, or an array of those. Creator calls with a known shape are turned
//! into data:
//! - `assign({...})`  → per-property capture
//! - `raise(event)`   → event object
//! - `log('msg')`     → the message
//! - `stop('id')`     → the actor id
//! - `sendTo(to, event, { id, delay })`
//!
//! Creators may be called bare or through a namespace (`actions.assign`).
//! Anything else is inline code, captured as a placeholder.

use tree_sitter::Node;

use super::literals::{event_object, literal_object, match_array, placeholder};
use crate::features::machine_extraction::domain::{
    inline_name, ExtractionErrorKind, Implementation, JsonItem,
};
use crate::features::machine_extraction::ports::ExtractionContext;
use crate::features::matching::infrastructure::bindings::{is_identifier_like, resolve_identifier};
use crate::features::matching::{match_number, match_string};
use crate::features::parsing::infrastructure::syntax::{
    has_only_plain_properties, named_children, object_properties, unwrap_type_wrapper,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    fields, is_type_wrapper, node_kinds,
};
use crate::shared::models::OrderedMap;

/// Name prefix of built-in action creators in the digraph
pub const BUILT_IN_PREFIX: &str = "xstate.";

/// Creators with dedicated extraction
pub const ACTION_CREATORS: &[&str] = &["assign", "raise", "log", "stop", "sendTo"];

/// Extract an action list (single value or array) in source order
pub fn extract_actions<'t>(
    ctx: &mut ExtractionContext<'t>,
    value: Node<'t>,
    owner_id: &str,
    slot: &str,
) -> Vec<Implementation> {
    let items = match match_array(value, ctx.file) {
        Some(array) => named_children(&array),
        None => vec![value],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| extract_action(ctx, item, owner_id, slot, index))
        .collect()
}

/// Extract one action
///
/// A malformed creator call records an error and is kept as inline code, so
/// list positions keep matching the source array.
pub fn extract_action<'t>(
    ctx: &mut ExtractionContext<'t>,
    node: Node<'t>,
    owner_id: &str,
    slot: &str,
    index: usize,
) -> Implementation {
    if let Some(name) = match_string(node, ctx.file) {
        let implementation = Implementation::named(name.value);
        ctx.register_action(&implementation);
        return implementation;
    }

    let inner = look_through(node, ctx);
    if inner.kind() == node_kinds::CALL_EXPRESSION {
        if let Some(creator) = action_creator_name(inner, ctx) {
            if let Some(implementation) = extract_creator_call(ctx, inner, creator) {
                return implementation;
            }
        }
    }

    let implementation = Implementation::inline(inline_name(owner_id, slot, index), ctx.text(&node));
    ctx.register_action(&implementation);
    implementation
}

/// Unwrap type assertions and identifier aliases
fn look_through<'t>(node: Node<'t>, ctx: &ExtractionContext<'t>) -> Node<'t> {
    let mut current = node;
    loop {
        if is_type_wrapper(current.kind()) {
            match unwrap_type_wrapper(&current) {
                Some(inner) => current = inner,
                None => return current,
            }
        } else if is_identifier_like(current.kind()) {
            match resolve_identifier(current, ctx.file) {
                Some(resolved) if resolved.id() != current.id() => current = resolved,
                _ => return current,
            }
        } else {
            return current;
        }
    }
}

/// `assign` for `assign(...)` and `actions.assign(...)`, if it is a known creator
pub fn action_creator_name(call: Node<'_>, ctx: &ExtractionContext<'_>) -> Option<&'static str> {
    let callee = call.child_by_field_name(fields::FUNCTION)?;
    let name_node = match callee.kind() {
        node_kinds::IDENTIFIER => callee,
        node_kinds::MEMBER_EXPRESSION => callee.child_by_field_name(fields::PROPERTY)?,
        _ => return None,
    };
    let name = ctx.text(&name_node);
    ACTION_CREATORS.iter().copied().find(|c| *c == name)
}

fn call_arguments<'t>(call: Node<'t>) -> Vec<Node<'t>> {
    call.child_by_field_name(fields::ARGUMENTS)
        .map(|args| named_children(&args))
        .unwrap_or_default()
}

fn extract_creator_call<'t>(
    ctx: &mut ExtractionContext<'t>,
    call: Node<'t>,
    creator: &'static str,
) -> Option<Implementation> {
    let args = call_arguments(call);
    let data = match creator {
        "assign" => extract_assign(ctx, call, &args),
        "raise" => extract_raise(ctx, call, &args),
        "log" => Some(extract_log(ctx, call, &args)),
        "stop" => extract_stop(ctx, call, &args),
        "sendTo" => Some(extract_send_to(ctx, &args)),
        _ => None,
    }?;
    Some(Implementation::with_data(
        format!("{}{}", BUILT_IN_PREFIX, creator),
        data,
    ))
}

fn unsupported(ctx: &mut ExtractionContext<'_>, call: Node<'_>, action: &str) -> Option<JsonItem> {
    ctx.error(
        ExtractionErrorKind::ActionUnsupported {
            action: action.to_string(),
        },
        Some(&call),
    );
    None
}

fn extract_assign<'t>(ctx: &mut ExtractionContext<'t>, call: Node<'t>, args: &[Node<'t>]) -> Option<JsonItem> {
    let Some(assigner) = args.first() else {
        return unsupported(ctx, call, "assign");
    };
    if assigner.kind() == node_kinds::OBJECT && has_only_plain_properties(assigner) {
        Some(JsonItem::Object(literal_object(*assigner, ctx.file)))
    } else {
        Some(placeholder(assigner, ctx.file))
    }
}

fn extract_raise<'t>(ctx: &mut ExtractionContext<'t>, call: Node<'t>, args: &[Node<'t>]) -> Option<JsonItem> {
    let Some(event) = args.first() else {
        return unsupported(ctx, call, "raise");
    };
    Some(event_argument(*event, ctx))
}

/// String shorthand → `{ type }`, object literal → event object, else placeholder
fn event_argument<'t>(event: Node<'t>, ctx: &ExtractionContext<'t>) -> JsonItem {
    if event.kind() == node_kinds::OBJECT {
        return event_object(event, ctx.file);
    }
    match match_string(event, ctx.file) {
        Some(name) => {
            let mut map = OrderedMap::new();
            map.insert("type", JsonItem::String(name.value));
            JsonItem::Object(map)
        }
        None => placeholder(&event, ctx.file),
    }
}

fn extract_log<'t>(ctx: &ExtractionContext<'t>, call: Node<'t>, args: &[Node<'t>]) -> JsonItem {
    args.first()
        .and_then(|arg| match_string(*arg, ctx.file))
        .map(|m| JsonItem::String(m.value))
        .unwrap_or_else(|| placeholder(&call, ctx.file))
}

fn extract_stop<'t>(ctx: &mut ExtractionContext<'t>, call: Node<'t>, args: &[Node<'t>]) -> Option<JsonItem> {
    let Some(actor) = args.first() else {
        return unsupported(ctx, call, "stop");
    };
    Some(match match_string(*actor, ctx.file) {
        Some(m) => JsonItem::String(m.value),
        None => placeholder(actor, ctx.file),
    })
}

fn extract_send_to<'t>(ctx: &ExtractionContext<'t>, args: &[Node<'t>]) -> JsonItem {
    let to = match args.first() {
        Some(actor) => match match_string(*actor, ctx.file) {
            Some(m) => JsonItem::String(m.value),
            None => placeholder(actor, ctx.file),
        },
        None => JsonItem::String(String::new()),
    };
    let event = match args.get(1) {
        Some(event) => event_argument(*event, ctx),
        None => JsonItem::Object(OrderedMap::new()),
    };

    let mut data = OrderedMap::new();
    data.insert("event", event);
    data.insert("to", to);
    data.insert("id", JsonItem::String(String::new()));
    data.insert("delay", JsonItem::Number(0.0));

    if let Some(options) = args.get(2).filter(|o| o.kind() == node_kinds::OBJECT) {
        for (key, _, value) in object_properties(options, &ctx.file.text) {
            let option = if let Some(m) = match_string(value, ctx.file) {
                JsonItem::String(m.value)
            } else if let Some(m) = match_number(value, ctx.file) {
                JsonItem::Number(m.value)
            } else {
                placeholder(&value, ctx.file)
            };
            data.insert(key, option);
        }
    }

    JsonItem::Object(data)
}
