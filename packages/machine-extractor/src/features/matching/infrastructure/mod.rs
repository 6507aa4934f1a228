//! Matcher implementations

pub mod bindings;
pub mod combinators;
pub mod scalars;
