//! Matcher combinators
//!
//! - `create_matcher`: node-kind predicate + parse function
//! - `union`: first successful matcher wins, tried in priority order
//! - `wrap`: derive a new value from a match
//! - `maybe_identifier`: look through `const x = <value>` bindings
//! - `maybe_type_assertion`: look through `as`, `satisfies`, `<T>`, `!`, `( )`
//!
//! The two "maybe" wrappers nest in either order. Both keep the outer node
//! as the match's edit target and read the value from the inner node.

use tree_sitter::Node;

use super::bindings::{is_identifier_like, resolve_identifier};
use crate::features::matching::domain::Matched;
use crate::features::matching::ports::{BoxedMatcher, Matcher};
use crate::features::parsing::infrastructure::syntax::unwrap_type_wrapper;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::is_type_wrapper;
use crate::features::parsing::SourceFile;

/// Matches nodes of the given kinds for which `parse` yields a value
pub struct NodeMatcher<T> {
    kinds: &'static [&'static str],
    parse: fn(Node<'_>, &SourceFile) -> Option<T>,
}

pub fn create_matcher<T>(
    kinds: &'static [&'static str],
    parse: fn(Node<'_>, &SourceFile) -> Option<T>,
) -> NodeMatcher<T> {
    NodeMatcher { kinds, parse }
}

impl<T> Matcher for NodeMatcher<T> {
    type Output = T;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, T>> {
        if !self.kinds.contains(&node.kind()) {
            return None;
        }
        (self.parse)(node, file).map(|value| Matched::new(node, value))
    }
}

/// Ordered alternatives
pub struct Union<T> {
    matchers: Vec<BoxedMatcher<T>>,
}

pub fn union<T>(matchers: Vec<BoxedMatcher<T>>) -> Union<T> {
    Union { matchers }
}

impl<T> Matcher for Union<T> {
    type Output = T;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, T>> {
        self.matchers.iter().find_map(|m| m.matches(node, file))
    }
}

/// Maps the value of an inner match
pub struct Wrap<M: Matcher, U> {
    inner: M,
    map: fn(M::Output) -> U,
}

pub fn wrap<M: Matcher, U>(inner: M, map: fn(M::Output) -> U) -> Wrap<M, U> {
    Wrap { inner, map }
}

impl<M: Matcher, U> Matcher for Wrap<M, U> {
    type Output = U;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, U>> {
        self.inner.matches(node, file).map(|m| m.map(self.map))
    }
}

/// Retries the inner matcher on an identifier's declared value
pub struct MaybeIdentifier<M> {
    inner: M,
}

pub fn maybe_identifier<M: Matcher>(inner: M) -> MaybeIdentifier<M> {
    MaybeIdentifier { inner }
}

impl<M: Matcher> Matcher for MaybeIdentifier<M> {
    type Output = M::Output;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, M::Output>> {
        if is_identifier_like(node.kind()) {
            let value = resolve_identifier(node, file)?;
            return self
                .inner
                .matches(value, file)
                .map(|m| m.with_outer(node));
        }
        self.inner.matches(node, file)
    }
}

/// Retries the inner matcher on the expression inside a type wrapper
pub struct MaybeTypeAssertion<M> {
    inner: M,
}

pub fn maybe_type_assertion<M: Matcher>(inner: M) -> MaybeTypeAssertion<M> {
    MaybeTypeAssertion { inner }
}

impl<M: Matcher> Matcher for MaybeTypeAssertion<M> {
    type Output = M::Output;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, M::Output>> {
        let mut current = node;
        while is_type_wrapper(current.kind()) {
            current = unwrap_type_wrapper(&current)?;
        }
        self.inner
            .matches(current, file)
            .map(|m| m.with_outer(node))
    }
}
