//! Matching domain models

mod matched;

pub use matched::{EnumValue, Matched, TemplateText};
