//! Literal capture shared by `assign`, event objects and `context`
//!
//! Plain literals become data. Everything else (arrays, nested objects,
//! `null`, regexes, interpolated templates, functions, identifiers) is kept
//! verbatim as an expression placeholder.

use once_cell::sync::Lazy;
use tree_sitter::Node;

use crate::features::machine_extraction::domain::JsonItem;
use crate::features::matching::{
    create_matcher, match_number, maybe_identifier, maybe_type_assertion, Matcher,
};
use crate::features::matching::ports::BoxedMatcher;
use crate::features::parsing::infrastructure::syntax::{
    has_only_plain_properties, node_text, object_properties, parse_number, static_template_text,
    string_literal_value,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::parsing::SourceFile;
use crate::shared::models::OrderedMap;

fn accept(_node: Node<'_>, _file: &SourceFile) -> Option<()> {
    Some(())
}

static OBJECT_LITERAL: Lazy<BoxedMatcher<()>> = Lazy::new(|| {
    Box::new(maybe_type_assertion(maybe_identifier(maybe_type_assertion(
        create_matcher(&[node_kinds::OBJECT], accept),
    ))))
});

static ARRAY_LITERAL: Lazy<BoxedMatcher<()>> = Lazy::new(|| {
    Box::new(maybe_type_assertion(maybe_identifier(maybe_type_assertion(
        create_matcher(&[node_kinds::ARRAY], accept),
    ))))
});

/// The object literal `node` is, aliases or wraps
pub fn match_object<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Node<'t>> {
    OBJECT_LITERAL.matches(node, file).map(|m| m.value_node)
}

/// The array literal `node` is, aliases or wraps
pub fn match_array<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Node<'t>> {
    ARRAY_LITERAL.matches(node, file).map(|m| m.value_node)
}

pub fn placeholder(node: &Node, file: &SourceFile) -> JsonItem {
    JsonItem::expression(node_text(node, &file.text))
}

/// Value of one property: a plain literal, or a placeholder
pub fn literal_value(value: Node<'_>, file: &SourceFile) -> JsonItem {
    let source = &file.text;
    let captured = match value.kind() {
        node_kinds::STRING => string_literal_value(&value, source).map(JsonItem::String),
        node_kinds::NUMBER => parse_number(node_text(&value, source)).map(JsonItem::Number),
        node_kinds::UNARY_EXPRESSION => match_number(value, file).map(|m| JsonItem::Number(m.value)),
        node_kinds::TRUE => Some(JsonItem::Bool(true)),
        node_kinds::FALSE => Some(JsonItem::Bool(false)),
        node_kinds::TEMPLATE_STRING => static_template_text(&value, source).map(JsonItem::String),
        _ => None,
    };
    captured.unwrap_or_else(|| placeholder(&value, file))
}

/// Per-property capture of an object literal
pub fn literal_object(object: Node<'_>, file: &SourceFile) -> OrderedMap<JsonItem> {
    object_properties(&object, &file.text)
        .into_iter()
        .map(|(key, _, value)| (key, literal_value(value, file)))
        .collect()
}

/// Event object: plain object literal → per-property capture, else placeholder
pub fn event_object(node: Node<'_>, file: &SourceFile) -> JsonItem {
    if node.kind() == node_kinds::OBJECT && has_only_plain_properties(&node) {
        JsonItem::Object(literal_object(node, file))
    } else {
        placeholder(&node, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::infrastructure::syntax::{find_child_by_kind, first_expression};
    use crate::features::parsing::{Parser, TreeSitterParser};

    fn parse(source: &str) -> SourceFile {
        TreeSitterParser::typescript().parse(source, "test.ts").unwrap()
    }

    /// Value of `const x = <value>;` on the first line
    fn initializer<'t>(file: &'t SourceFile) -> Node<'t> {
        let decl = first_expression(&file.root()).unwrap();
        let declarator = find_child_by_kind(&decl, "variable_declarator").unwrap();
        declarator.child_by_field_name("value").unwrap()
    }

    #[test]
    fn test_plain_literals_and_placeholders() {
        let file = parse(
            "const x = { a: 'str', b: -2, c: true, d: `t`, e: null, f: [1], g: { h: 1 }, i: /r/, j: `x${y}`, k: () => 1 };",
        );
        let map = literal_object(initializer(&file), &file);

        assert_eq!(map.get("a"), Some(&JsonItem::String("str".into())));
        assert_eq!(map.get("b"), Some(&JsonItem::Number(-2.0)));
        assert_eq!(map.get("c"), Some(&JsonItem::Bool(true)));
        assert_eq!(map.get("d"), Some(&JsonItem::String("t".into())));
        assert_eq!(map.get("e"), Some(&JsonItem::expression("null")));
        assert_eq!(map.get("f"), Some(&JsonItem::expression("[1]")));
        assert_eq!(map.get("g"), Some(&JsonItem::expression("{ h: 1 }")));
        assert_eq!(map.get("i"), Some(&JsonItem::expression("/r/")));
        assert_eq!(map.get("j"), Some(&JsonItem::expression("`x${y}`")));
        assert_eq!(map.get("k"), Some(&JsonItem::expression("() => 1")));
        assert_eq!(map.keys().count(), 10);
    }

    #[test]
    fn test_event_object_with_spread_is_placeholder() {
        let file = parse("const x = { type: 'GO', ...rest };");
        assert_eq!(
            event_object(initializer(&file), &file),
            JsonItem::expression("{ type: 'GO', ...rest }")
        );
    }

    #[test]
    fn test_match_object_through_alias() {
        let file = parse("const x = { a: 1 } as const;");
        let object = match_object(initializer(&file), &file).unwrap();
        assert_eq!(object.kind(), "object");
        assert!(match_array(initializer(&file), &file).is_none());
    }
}
