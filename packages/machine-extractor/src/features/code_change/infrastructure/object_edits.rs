//! Layout primitives for object literals
//!
//! Existing text is never reformatted. New members follow the layout of the
//! object they land in: one per line when the object is multi-line, `, `
//! separated otherwise.

use serde_json::Value;
use tree_sitter::Node;

use super::super::domain::TextEdit;
use crate::config::ExtractorConfig;
use crate::features::machine_extraction::domain::{EXPRESSION_TAG, EXPRESSION_TAG_VALUE};
use crate::features::parsing::infrastructure::syntax::{
    closing_token, line_indent, object_members, opening_token, property_key, spans_lines,
    trailing_comma,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::shared::models::TextRange;

/// Insertion rank of the properties whose position is kept conventional
pub fn property_rank(name: &str) -> Option<u8> {
    match name {
        "states" => Some(4),
        "initial" => Some(3),
        "type" => Some(2),
        "history" => Some(1),
        _ => None,
    }
}

pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// A property name as written in source: bare when possible
pub fn render_key(name: &str, config: &ExtractorConfig) -> String {
    if is_identifier_name(name) {
        name.to_string()
    } else {
        config.quote_string(name)
    }
}

/// Single-line JS literal for a JSON value
///
/// Expression placeholders are written back as their verbatim code.
pub fn render_js_value(value: &Value, config: &ExtractorConfig) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => config.quote_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|v| render_js_value(v, config)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            if map.get(EXPRESSION_TAG).and_then(Value::as_str) == Some(EXPRESSION_TAG_VALUE) {
                if let Some(code) = map.get("code").and_then(Value::as_str) {
                    return code.to_string();
                }
            }
            if map.is_empty() {
                return "{}".to_string();
            }
            let members: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_key(k, config), render_js_value(v, config)))
                .collect();
            format!("{{ {} }}", members.join(", "))
        }
    }
}

/// Prefix every line after the first with `indent`
pub fn indent_continuation(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{}", indent))
}

/// Range strictly between the braces (or brackets) of a literal
pub fn inner_range(literal: &Node) -> Option<TextRange> {
    let open = opening_token(literal)?;
    let close = closing_token(literal)?;
    (open.end_byte() <= close.start_byte()).then(|| TextRange::new(open.end_byte(), close.start_byte()))
}

/// Layout of an object literal's member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLayout {
    pub multiline: bool,

    /// Indentation of member lines
    pub indent: String,
}

impl MemberLayout {
    pub fn of(object: &Node, source: &str, config: &ExtractorConfig) -> Self {
        let members = object_members(object);
        let open_end = opening_token(object).map(|t| t.end_byte()).unwrap_or(object.start_byte());
        match members.first() {
            Some(first) => {
                let multiline = spans_lines(source, open_end, first.start_byte());
                let indent = if multiline {
                    line_indent(source, first.start_byte()).to_string()
                } else {
                    format!("{}{}", line_indent(source, object.start_byte()), config.indent_unit())
                };
                Self { multiline, indent }
            }
            None => Self {
                multiline: true,
                indent: format!("{}{}", line_indent(source, object.start_byte()), config.indent_unit()),
            },
        }
    }
}

/// Insert `property` directly before `member`
pub fn insert_before(member: &Node, property: &str, layout: &MemberLayout) -> TextEdit {
    let text = if layout.multiline {
        format!("{},\n{}", indent_continuation(property, &layout.indent), layout.indent)
    } else {
        format!("{}, ", property)
    };
    TextEdit::insert(member.start_byte(), text)
}

/// Insert `property` after the last member; `None` for an empty object
pub fn append_member(object: &Node, property: &str, layout: &MemberLayout) -> Option<TextEdit> {
    let last = object_members(object).into_iter().last()?;
    let property = indent_continuation(property, &layout.indent);
    let edit = match (trailing_comma(&last), layout.multiline) {
        (Some(comma), true) => TextEdit::insert(comma.end_byte(), format!("\n{}{},", layout.indent, property)),
        (Some(comma), false) => TextEdit::insert(comma.end_byte(), format!(" {},", property)),
        (None, true) => TextEdit::insert(last.end_byte(), format!(",\n{}{}", layout.indent, property)),
        (None, false) => TextEdit::insert(last.end_byte(), format!(", {}", property)),
    };
    Some(edit)
}

/// Fill an empty object with `properties`, one per line
pub fn fill_empty(object: &Node, properties: &[String], source: &str, config: &ExtractorConfig) -> Option<TextEdit> {
    let inner = inner_range(object)?;
    let outer = line_indent(source, object.start_byte());
    let indent = format!("{}{}", outer, config.indent_unit());
    let lines: Vec<String> = properties
        .iter()
        .map(|p| format!("{}{}", indent, indent_continuation(p, &indent)))
        .collect();
    Some(TextEdit::replace(inner, format!("\n{}\n{}", lines.join(",\n"), outer)))
}

/// First member whose rank is strictly below `rank`, else the first member
pub fn priority_anchor<'t>(object: &Node<'t>, rank: u8, source: &str) -> Option<Node<'t>> {
    let members = object_members(object);
    members
        .iter()
        .find(|m| member_name(m, source).and_then(|n| property_rank(&n)).is_some_and(|r| r < rank))
        .or_else(|| members.first())
        .copied()
}

fn member_name(member: &Node, source: &str) -> Option<String> {
    match member.kind() {
        node_kinds::PAIR => property_key(member, source),
        node_kinds::SHORTHAND_PROPERTY_IDENTIFIER => source.get(member.byte_range()).map(str::to_string),
        _ => None,
    }
}

/// Range deleting `member` together with one separator
///
/// Followed by a sibling: up to the sibling. Last of several: from the end of
/// the previous member. Only member: everything between the braces.
pub fn removal_range(object: &Node, member: &Node) -> Option<TextRange> {
    let members = object_members(object);
    let position = members.iter().position(|m| m.id() == member.id())?;
    if let Some(next) = members.get(position + 1) {
        return Some(TextRange::new(member.start_byte(), next.start_byte()));
    }
    if position > 0 {
        let previous = members[position - 1];
        return Some(TextRange::new(previous.end_byte(), member.end_byte()));
    }
    inner_range(object)
}
