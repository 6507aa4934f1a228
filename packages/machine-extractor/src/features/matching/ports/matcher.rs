//! Matcher port

use tree_sitter::Node;

use crate::features::matching::domain::Matched;
use crate::features::parsing::SourceFile;

/// Typed match over one syntax node
///
/// Returns `None` for "no match"; never panics on unexpected shapes.
pub trait Matcher: Send + Sync {
    type Output;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, Self::Output>>;
}

pub type BoxedMatcher<T> = Box<dyn Matcher<Output = T>>;

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    type Output = M::Output;

    fn matches<'t>(&self, node: Node<'t>, file: &'t SourceFile) -> Option<Matched<'t, Self::Output>> {
        (**self).matches(node, file)
    }
}
