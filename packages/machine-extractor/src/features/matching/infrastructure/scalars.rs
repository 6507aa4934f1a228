//! Scalar extractors
//!
//! String, number, boolean and template literal matchers. Each tries, in
//! order: an enum member reference, then the literal itself looked up
//! through identifiers and type assertions.

use once_cell::sync::Lazy;
use tree_sitter::Node;

use super::bindings::resolve_enum_member;
use super::combinators::{create_matcher, maybe_identifier, maybe_type_assertion, union, Union};
use crate::features::matching::domain::{EnumValue, Matched, TemplateText};
use crate::features::matching::ports::{BoxedMatcher, Matcher};
use crate::features::parsing::infrastructure::syntax::{
    node_text, parse_number, static_template_text, string_literal_value,
};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    fields, node_kinds,
};
use crate::features::parsing::SourceFile;

/// `Enum.Member` whose constant value has the wanted shape
struct EnumMemberMatcher<T> {
    pick: fn(EnumValue) -> Option<T>,
}

impl<T> Matcher for EnumMemberMatcher<T> {
    type Output = T;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, T>> {
        let (value, value_node) = resolve_enum_member(node, file)?;
        let value = (self.pick)(value)?;
        Some(Matched {
            node,
            value_node,
            value,
        })
    }
}

fn enum_string(value: EnumValue) -> Option<String> {
    match value {
        EnumValue::String(s) => Some(s),
        EnumValue::Number(_) => None,
    }
}

fn enum_number(value: EnumValue) -> Option<f64> {
    match value {
        EnumValue::Number(n) => Some(n),
        EnumValue::String(_) => None,
    }
}

fn parse_string(node: Node<'_>, file: &SourceFile) -> Option<String> {
    string_literal_value(&node, &file.text)
}

fn parse_numeric(node: Node<'_>, file: &SourceFile) -> Option<f64> {
    match node.kind() {
        node_kinds::NUMBER => parse_number(node_text(&node, &file.text)),
        node_kinds::UNARY_EXPRESSION => {
            let operator = node.child_by_field_name(fields::OPERATOR)?;
            let argument = node.child_by_field_name(fields::ARGUMENT)?;
            if argument.kind() != node_kinds::NUMBER {
                return None;
            }
            let value = parse_number(node_text(&argument, &file.text))?;
            match node_text(&operator, &file.text) {
                "-" => Some(-value),
                "+" => Some(value),
                _ => None,
            }
        }
        _ => None,
    }
}

fn parse_boolean(node: Node<'_>, _file: &SourceFile) -> Option<bool> {
    match node.kind() {
        node_kinds::TRUE => Some(true),
        node_kinds::FALSE => Some(false),
        _ => None,
    }
}

fn parse_template(node: Node<'_>, file: &SourceFile) -> Option<TemplateText> {
    Some(match static_template_text(&node, &file.text) {
        Some(text) => TemplateText::Static(text),
        None => TemplateText::Interpolated(node_text(&node, &file.text).to_string()),
    })
}

/// Literal lookup through identifiers and type assertions on both sides
fn indirect<T: 'static>(
    kinds: &'static [&'static str],
    parse: fn(Node<'_>, &SourceFile) -> Option<T>,
) -> BoxedMatcher<T> {
    Box::new(maybe_type_assertion(maybe_identifier(maybe_type_assertion(
        create_matcher(kinds, parse),
    ))))
}

pub static STRING_LITERAL: Lazy<Union<String>> = Lazy::new(|| {
    union(vec![
        Box::new(EnumMemberMatcher { pick: enum_string }) as BoxedMatcher<String>,
        indirect(&[node_kinds::STRING], parse_string),
    ])
});

pub static NUMERIC_LITERAL: Lazy<Union<f64>> = Lazy::new(|| {
    union(vec![
        Box::new(EnumMemberMatcher { pick: enum_number }) as BoxedMatcher<f64>,
        indirect(&[node_kinds::NUMBER, node_kinds::UNARY_EXPRESSION], parse_numeric),
    ])
});

pub static BOOLEAN_LITERAL: Lazy<Union<bool>> =
    Lazy::new(|| union(vec![indirect(&[node_kinds::TRUE, node_kinds::FALSE], parse_boolean)]));

pub static TEMPLATE_LITERAL: Lazy<Union<TemplateText>> =
    Lazy::new(|| union(vec![indirect(&[node_kinds::TEMPLATE_STRING], parse_template)]));

pub fn match_string<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, String>> {
    STRING_LITERAL.matches(node, file)
}

pub fn match_number<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, f64>> {
    NUMERIC_LITERAL.matches(node, file)
}

pub fn match_boolean<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, bool>> {
    BOOLEAN_LITERAL.matches(node, file)
}

pub fn match_template<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, TemplateText>> {
    TEMPLATE_LITERAL.matches(node, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::infrastructure::syntax::first_expression;
    use crate::features::parsing::{Parser, TreeSitterParser};

    fn parse(source: &str) -> SourceFile {
        TreeSitterParser::typescript().parse(source, "test.ts").unwrap()
    }

    /// First argument of the `probe(...)` call
    fn probe_argument<'t>(file: &'t SourceFile) -> Node<'t> {
        fn find<'t>(node: Node<'t>, file: &'t SourceFile) -> Option<Node<'t>> {
            if node.kind() == node_kinds::CALL_EXPRESSION
                && file.text_of(&node).starts_with("probe(")
            {
                let args = node.child_by_field_name(fields::ARGUMENTS)?;
                return first_expression(&args);
            }
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            children.into_iter().find_map(|c| find(c, file))
        }
        find(file.root(), file).unwrap()
    }

    #[test]
    fn test_string_forms() {
        for (source, expected) in [
            ("probe('plain');", "plain"),
            ("probe(\"esc\\naped\");", "esc\naped"),
            ("const s = 'aliased';\nprobe(s);", "aliased"),
            ("probe('asserted' as const);", "asserted"),
            ("enum Ev { Go = 'GO' }\nprobe(Ev.Go);", "GO"),
        ] {
            let file = parse(source);
            let m = match_string(probe_argument(&file), &file)
                .unwrap_or_else(|| panic!("no match for {source}"));
            assert_eq!(m.value, expected, "{source}");
        }
    }

    #[test]
    fn test_string_rejects_non_strings() {
        let file = parse("probe(42);");
        assert!(match_string(probe_argument(&file), &file).is_none());
        let file = parse("enum N { A }\nprobe(N.A);");
        assert!(match_string(probe_argument(&file), &file).is_none());
    }

    #[test]
    fn test_numbers() {
        let file = parse("probe(-1.5);");
        assert_eq!(match_number(probe_argument(&file), &file).unwrap().value, -1.5);
        let file = parse("const delay = 1_000;\nprobe(delay);");
        assert_eq!(match_number(probe_argument(&file), &file).unwrap().value, 1000.0);
        let file = parse("enum N { A, B }\nprobe(N.B);");
        assert_eq!(match_number(probe_argument(&file), &file).unwrap().value, 1.0);
    }

    #[test]
    fn test_booleans() {
        let file = parse("const flag = true;\nprobe(flag);");
        assert!(match_boolean(probe_argument(&file), &file).unwrap().value);
    }

    #[test]
    fn test_templates() {
        let file = parse("probe(`static text`);");
        assert_eq!(
            match_template(probe_argument(&file), &file).unwrap().value,
            TemplateText::Static("static text".into())
        );

        let file = parse("probe(`hello ${name}`);");
        assert_eq!(
            match_template(probe_argument(&file), &file).unwrap().value,
            TemplateText::Interpolated("`hello ${name}`".into())
        );
    }
}
