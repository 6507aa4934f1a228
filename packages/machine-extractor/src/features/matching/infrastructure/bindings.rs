//! Symbol bindings
//!
//! The slice of symbol information the matchers need from the front end:
//! - identifier → initializer of its `const`/`let`/`var` declaration
//! - `Enum.Member` → the member's constant value
//!
//! Resolution is lexical and file-local. Anything that needs real type
//! inference resolves to `None`, and callers fall back to placeholders.

use tree_sitter::Node;

use crate::features::matching::domain::EnumValue;
use crate::features::parsing::infrastructure::syntax::{
    named_children, node_text, parse_number, string_literal_value,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    fields, is_type_only, node_kinds,
};
use crate::features::parsing::SourceFile;

/// Upper bound on `const a = b; const b = c; ...` chains
const MAX_ALIAS_DEPTH: usize = 8;

/// Initializer of the declaration an identifier refers to
///
/// Follows identifier-to-identifier aliases up to a fixed depth.
pub fn resolve_identifier<'t>(ident: Node<'t>, file: &'t SourceFile) -> Option<Node<'t>> {
    let mut current = ident;
    for _ in 0..MAX_ALIAS_DEPTH {
        if !is_identifier_like(current.kind()) {
            return Some(current);
        }
        let name = node_text(&current, &file.text);
        current = find_declaration_value(current, name, file)?;
    }
    None
}

/// Plain identifiers and shorthand `{ name }` properties
pub fn is_identifier_like(kind: &str) -> bool {
    matches!(
        kind,
        node_kinds::IDENTIFIER | node_kinds::SHORTHAND_PROPERTY_IDENTIFIER
    )
}

fn find_declaration_value<'t>(from: Node<'t>, name: &str, file: &'t SourceFile) -> Option<Node<'t>> {
    let mut scope = from.parent();
    while let Some(node) = scope {
        for child in named_children(&node) {
            if let Some(value) = declared_value(child, name, file) {
                // `const a = a` and other self-references
                if value.start_byte() <= from.start_byte() && from.end_byte() <= value.end_byte() {
                    continue;
                }
                return Some(value);
            }
        }
        scope = node.parent();
    }
    None
}

fn declared_value<'t>(statement: Node<'t>, name: &str, file: &'t SourceFile) -> Option<Node<'t>> {
    match statement.kind() {
        node_kinds::LEXICAL_DECLARATION | node_kinds::VARIABLE_DECLARATION => {
            named_children(&statement)
                .into_iter()
                .filter(|d| d.kind() == node_kinds::VARIABLE_DECLARATOR)
                .find(|d| {
                    d.child_by_field_name(fields::NAME)
                        .map(|n| n.kind() == node_kinds::IDENTIFIER && node_text(&n, &file.text) == name)
                        .unwrap_or(false)
                })
                .and_then(|d| d.child_by_field_name(fields::VALUE))
        }
        node_kinds::EXPORT_STATEMENT => statement
            .child_by_field_name(fields::DECLARATION)
            .and_then(|decl| declared_value(decl, name, file)),
        _ => None,
    }
}

/// Constant value of `Enum.Member`, with the node the value was read from
pub fn resolve_enum_member<'t>(
    member: Node<'t>,
    file: &'t SourceFile,
) -> Option<(EnumValue, Node<'t>)> {
    if member.kind() != node_kinds::MEMBER_EXPRESSION {
        return None;
    }
    let object = member.child_by_field_name(fields::OBJECT)?;
    let property = member.child_by_field_name(fields::PROPERTY)?;
    if object.kind() != node_kinds::IDENTIFIER {
        return None;
    }
    let enum_name = node_text(&object, &file.text);
    let member_name = node_text(&property, &file.text);

    let declaration = find_enum_declaration(file.root(), enum_name, file)?;
    let body = declaration.child_by_field_name(fields::BODY)?;
    enum_members(body, file)
        .into_iter()
        .find(|(name, _, _)| name == member_name)
        .and_then(|(_, value, node)| value.map(|v| (v, node)))
}

fn find_enum_declaration<'t>(node: Node<'t>, name: &str, file: &'t SourceFile) -> Option<Node<'t>> {
    if node.kind() == node_kinds::ENUM_DECLARATION {
        let matches_name = node
            .child_by_field_name(fields::NAME)
            .map(|n| node_text(&n, &file.text) == name)
            .unwrap_or(false);
        return matches_name.then_some(node);
    }
    if is_type_only(node.kind()) {
        return None;
    }
    named_children(&node)
        .into_iter()
        .find_map(|child| find_enum_declaration(child, name, file))
}

/// (member name, constant value, value node) in declaration order
///
/// Members without an initializer continue the numeric sequence of the
/// previous member; after a non-numeric member the sequence is unknown.
fn enum_members<'t>(body: Node<'t>, file: &'t SourceFile) -> Vec<(String, Option<EnumValue>, Node<'t>)> {
    let mut members = Vec::new();
    let mut next_auto: Option<f64> = Some(0.0);

    for child in named_children(&body) {
        match child.kind() {
            node_kinds::PROPERTY_IDENTIFIER | node_kinds::STRING => {
                let name = member_name(child, file);
                let value = next_auto.map(EnumValue::Number);
                next_auto = next_auto.map(|n| n + 1.0);
                members.push((name, value, child));
            }
            node_kinds::ENUM_ASSIGNMENT => {
                let Some(name_node) = named_children(&child).into_iter().next() else {
                    continue;
                };
                let name = member_name(name_node, file);
                let value_node = child.child_by_field_name(fields::VALUE).unwrap_or(child);
                let value = constant_value(value_node, file);
                next_auto = match value {
                    Some(EnumValue::Number(n)) => Some(n + 1.0),
                    _ => None,
                };
                members.push((name, value, value_node));
            }
            _ => {}
        }
    }

    members
}

fn member_name(node: Node, file: &SourceFile) -> String {
    string_literal_value(&node, &file.text).unwrap_or_else(|| node_text(&node, &file.text).to_string())
}

fn constant_value(node: Node, file: &SourceFile) -> Option<EnumValue> {
    match node.kind() {
        node_kinds::STRING => string_literal_value(&node, &file.text).map(EnumValue::String),
        node_kinds::NUMBER => parse_number(node_text(&node, &file.text)).map(EnumValue::Number),
        node_kinds::UNARY_EXPRESSION => {
            let operator = node.child_by_field_name(fields::OPERATOR)?;
            let argument = node.child_by_field_name(fields::ARGUMENT)?;
            match (node_text(&operator, &file.text), constant_value(argument, file)?) {
                ("-", EnumValue::Number(n)) => Some(EnumValue::Number(-n)),
                ("+", EnumValue::Number(n)) => Some(EnumValue::Number(n)),
                _ => None,
            }
        }
        _ => None,
    }
}
