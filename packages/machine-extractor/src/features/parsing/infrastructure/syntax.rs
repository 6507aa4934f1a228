//! Node helpers shared by matchers, extractors and the patch engine
//!
//! - Node traversal (named children without comments, child index)
//! - Text extraction and literal decoding
//! - Object literal property access
//! - Layout queries (line indentation, trailing commas)

use tree_sitter::Node;

use super::tree_sitter::languages::typescript::{fields, node_kinds};
use crate::shared::models::TextRange;

/// Extract text from a node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

pub fn node_range(node: &Node) -> TextRange {
    TextRange::new(node.start_byte(), node.end_byte())
}

/// Named children, skipping comments
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != node_kinds::COMMENT)
        .collect()
}

/// Find first child of a specific kind
pub fn find_child_by_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Position of `node` among all children (named and anonymous) of its parent
pub fn child_index(node: &Node) -> Option<usize> {
    let parent = node.parent()?;
    (0..parent.child_count()).find(|&i| parent.child(i).map(|c| c.id()) == Some(node.id()))
}

/// First named, non-comment child (the wrapped expression of type wrappers)
pub fn first_expression<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    named_children(node).into_iter().next()
}

/// Expression inside a type wrapper (`x as T`, `<T>x`, `x!`, `(x)`, ...)
pub fn unwrap_type_wrapper<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let children = named_children(node);
    if node.kind() == node_kinds::TYPE_ASSERTION {
        children.into_iter().last()
    } else {
        children.into_iter().next()
    }
}

/// Members of an object literal in source order (pairs, spreads, methods, ...)
pub fn object_members<'t>(object: &Node<'t>) -> Vec<Node<'t>> {
    if object.kind() != node_kinds::OBJECT {
        return Vec::new();
    }
    named_children(object)
}

/// Whether every member of an object literal is a plain property
/// (`key: value` with a static key, or shorthand `key`)
pub fn has_only_plain_properties(object: &Node) -> bool {
    object_members(object).iter().all(|m| match m.kind() {
        node_kinds::PAIR => !is_computed_key(m),
        node_kinds::SHORTHAND_PROPERTY_IDENTIFIER => true,
        _ => false,
    })
}

fn is_computed_key(pair: &Node) -> bool {
    pair.child_by_field_name(fields::KEY)
        .map(|k| k.kind() == node_kinds::COMPUTED_PROPERTY_NAME)
        .unwrap_or(true)
}

/// Static name of a pair's key: identifiers, string and number keys
pub fn property_key(pair: &Node, source: &str) -> Option<String> {
    let key = pair.child_by_field_name(fields::KEY)?;
    match key.kind() {
        node_kinds::PROPERTY_IDENTIFIER | node_kinds::IDENTIFIER => {
            Some(node_text(&key, source).to_string())
        }
        node_kinds::STRING => string_literal_value(&key, source),
        node_kinds::NUMBER => Some(node_text(&key, source).to_string()),
        _ => None,
    }
}

/// (key, member, value) of every static property of an object literal
///
/// For shorthand `{ key }` members the member and the value are the same
/// identifier node.
pub fn object_properties<'t>(object: &Node<'t>, source: &str) -> Vec<(String, Node<'t>, Node<'t>)> {
    object_members(object)
        .into_iter()
        .filter_map(|member| match member.kind() {
            node_kinds::PAIR => {
                let key = property_key(&member, source)?;
                let value = member.child_by_field_name(fields::VALUE)?;
                Some((key, member, value))
            }
            node_kinds::SHORTHAND_PROPERTY_IDENTIFIER => {
                Some((node_text(&member, source).to_string(), member, member))
            }
            _ => None,
        })
        .collect()
}

/// The pair node for `name` in an object literal
pub fn find_property<'t>(object: &Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    object_properties(object, source)
        .into_iter()
        .find(|(key, _, _)| key == name)
        .map(|(_, pair, _)| pair)
}

/// Decoded value of a string literal node (quotes removed, escapes applied)
pub fn string_literal_value(node: &Node, source: &str) -> Option<String> {
    if node.kind() != node_kinds::STRING {
        return None;
    }
    let mut value = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            node_kinds::STRING_FRAGMENT => value.push_str(node_text(&child, source)),
            node_kinds::ESCAPE_SEQUENCE => value.push_str(&unescape(node_text(&child, source))),
            _ => {}
        }
    }
    Some(value)
}

/// Decode one JavaScript escape sequence (`\n`, `A`, `\x41`, `\'`, ...)
pub fn unescape(sequence: &str) -> String {
    let body = sequence.strip_prefix('\\').unwrap_or(sequence);
    let mut chars = body.chars();
    match chars.next() {
        Some('n') => "\n".to_string(),
        Some('t') => "\t".to_string(),
        Some('r') => "\r".to_string(),
        Some('b') => "\u{8}".to_string(),
        Some('f') => "\u{c}".to_string(),
        Some('v') => "\u{b}".to_string(),
        Some('0') if body.len() == 1 => "\0".to_string(),
        Some('x') => decode_code_point(&body[1..]).unwrap_or_else(|| body.to_string()),
        Some('u') => {
            let hex = body[1..].trim_start_matches('{').trim_end_matches('}');
            decode_code_point(hex).unwrap_or_else(|| body.to_string())
        }
        // Line continuation
        Some('\n') | Some('\r') => String::new(),
        Some(c) => c.to_string(),
        None => String::new(),
    }
}

fn decode_code_point(hex: &str) -> Option<String> {
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .map(|c| c.to_string())
}

/// Raw text of a template literal without substitutions
///
/// Returns `None` when the template interpolates anything.
pub fn static_template_text(node: &Node, source: &str) -> Option<String> {
    if node.kind() != node_kinds::TEMPLATE_STRING {
        return None;
    }
    if find_child_by_kind(node, node_kinds::TEMPLATE_SUBSTITUTION).is_some() {
        return None;
    }
    let text = node_text(node, source);
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .map(|t| t.to_string())
}

/// Parse a JavaScript numeric literal (`1`, `1.5e3`, `0x1f`, `1_000`)
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = |digits: &str, radix: u32| i64::from_str_radix(digits, radix).ok().map(|v| v as f64);
    if let Some(hex) = lower.strip_prefix("0x") {
        return radix(hex, 16);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return radix(oct, 8);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return radix(bin, 2);
    }
    // BigInt suffix
    let decimal = lower.strip_suffix('n').unwrap_or(&lower);
    decimal.parse::<f64>().ok()
}

/// Leading whitespace of the line containing `offset`
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset.min(source.len())]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let rest = &source[line_start..];
    let width = rest
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    &rest[..width]
}

/// Whether a line break occurs in `source[start..end]`
pub fn spans_lines(source: &str, start: usize, end: usize) -> bool {
    source.get(start..end).map(|s| s.contains('\n')).unwrap_or(false)
}

/// The `,` token directly following `node` among its siblings, if any
pub fn trailing_comma<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        if sibling.kind() == node_kinds::COMMENT {
            next = sibling.next_sibling();
            continue;
        }
        return (sibling.kind() == node_kinds::COMMA).then_some(sibling);
    }
    None
}

/// The `{` / `[` opening token of an object or array literal
pub fn opening_token<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child(0)
}

/// The `}` / `]` closing token of an object or array literal
pub fn closing_token<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child(node.child_count().checked_sub(1)?)
}
