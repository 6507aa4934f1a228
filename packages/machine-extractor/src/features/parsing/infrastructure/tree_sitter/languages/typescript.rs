//! TypeScript-specific tree-sitter configuration
//!
//! Node kind names from the tree-sitter-typescript grammar. Matchers compare
//! against these constants, never against string literals scattered in code.

/// TypeScript tree-sitter node kinds
pub mod node_kinds {
    // Program structure
    pub const PROGRAM: &str = "program";
    pub const COMMENT: &str = "comment";
    pub const STATEMENT_BLOCK: &str = "statement_block";
    pub const EXPORT_STATEMENT: &str = "export_statement";

    // Declarations
    pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const ENUM_BODY: &str = "enum_body";
    pub const ENUM_ASSIGNMENT: &str = "enum_assignment";

    // Expressions
    pub const CALL_EXPRESSION: &str = "call_expression";
    pub const ARGUMENTS: &str = "arguments";
    pub const MEMBER_EXPRESSION: &str = "member_expression";
    pub const IDENTIFIER: &str = "identifier";
    pub const PROPERTY_IDENTIFIER: &str = "property_identifier";
    pub const SHORTHAND_PROPERTY_IDENTIFIER: &str = "shorthand_property_identifier";
    pub const UNARY_EXPRESSION: &str = "unary_expression";
    pub const PARENTHESIZED_EXPRESSION: &str = "parenthesized_expression";
    pub const ARROW_FUNCTION: &str = "arrow_function";
    pub const FUNCTION_EXPRESSION: &str = "function_expression";
    pub const SPREAD_ELEMENT: &str = "spread_element";

    // Object / array literals
    pub const OBJECT: &str = "object";
    pub const PAIR: &str = "pair";
    pub const ARRAY: &str = "array";
    pub const COMPUTED_PROPERTY_NAME: &str = "computed_property_name";

    // Literals
    pub const STRING: &str = "string";
    pub const STRING_FRAGMENT: &str = "string_fragment";
    pub const ESCAPE_SEQUENCE: &str = "escape_sequence";
    pub const TEMPLATE_STRING: &str = "template_string";
    pub const TEMPLATE_SUBSTITUTION: &str = "template_substitution";
    pub const NUMBER: &str = "number";
    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";
    pub const NULL: &str = "null";
    pub const UNDEFINED: &str = "undefined";
    pub const REGEX: &str = "regex";

    // Type-level wrappers around expressions
    pub const AS_EXPRESSION: &str = "as_expression";
    pub const SATISFIES_EXPRESSION: &str = "satisfies_expression";
    pub const TYPE_ASSERTION: &str = "type_assertion";
    pub const NON_NULL_EXPRESSION: &str = "non_null_expression";

    // Type syntax (never contains runtime calls)
    pub const TYPE_ANNOTATION: &str = "type_annotation";
    pub const TYPE_ARGUMENTS: &str = "type_arguments";
    pub const TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";

    // Anonymous tokens
    pub const COMMA: &str = ",";
}

/// Field names used with `child_by_field_name`
pub mod fields {
    pub const FUNCTION: &str = "function";
    pub const ARGUMENTS: &str = "arguments";
    pub const OBJECT: &str = "object";
    pub const PROPERTY: &str = "property";
    pub const KEY: &str = "key";
    pub const VALUE: &str = "value";
    pub const NAME: &str = "name";
    pub const BODY: &str = "body";
    pub const ARGUMENT: &str = "argument";
    pub const OPERATOR: &str = "operator";
    pub const DECLARATION: &str = "declaration";
}

use node_kinds::*;

/// Wrappers that only change the static type of the inner expression
pub const TYPE_WRAPPER_KINDS: &[&str] = &[
    AS_EXPRESSION,
    SATISFIES_EXPRESSION,
    TYPE_ASSERTION,
    NON_NULL_EXPRESSION,
    PARENTHESIZED_EXPRESSION,
];

/// Subtrees that are pure type syntax
pub const TYPE_ONLY_KINDS: &[&str] = &[
    TYPE_ANNOTATION,
    TYPE_ARGUMENTS,
    TYPE_ALIAS_DECLARATION,
    INTERFACE_DECLARATION,
];

pub fn is_type_wrapper(kind: &str) -> bool {
    TYPE_WRAPPER_KINDS.contains(&kind)
}

pub fn is_type_only(kind: &str) -> bool {
    TYPE_ONLY_KINDS.contains(&kind)
}

/// File extensions handled by the TSX grammar
pub fn uses_tsx_grammar(ext: &str) -> bool {
    matches!(ext, "tsx" | "jsx")
}
