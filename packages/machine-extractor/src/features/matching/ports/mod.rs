//! Matching ports

mod matcher;

pub use matcher::{BoxedMatcher, Matcher};
