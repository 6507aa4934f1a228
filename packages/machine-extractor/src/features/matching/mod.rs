//! Matching Feature
//!
//! Composable matchers over syntax-tree nodes and the scalar extractors
//! built from them.
//!
//! ## Structure
//! - `domain/` - Matched result, scalar value shapes
//! - `ports/` - Matcher trait
//! - `infrastructure/` - combinators, symbol bindings, scalar matchers

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{EnumValue, Matched, TemplateText};
pub use infrastructure::combinators::{
    create_matcher, maybe_identifier, maybe_type_assertion, union, wrap, MaybeIdentifier,
    MaybeTypeAssertion, NodeMatcher, Union, Wrap,
};
pub use infrastructure::scalars::{
    match_boolean, match_number, match_string, match_template, BOOLEAN_LITERAL, NUMERIC_LITERAL,
    STRING_LITERAL, TEMPLATE_LITERAL,
};
pub use ports::Matcher;
