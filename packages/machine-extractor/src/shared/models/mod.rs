//! Shared models

mod error;
mod ordered_map;
mod span;

pub use error::{ErrorKind, ExtractorError, Result};
pub use ordered_map::OrderedMap;
pub use span::{LineIndex, Span, TextRange};

// Re-export serde_json::Value for convenience (patch values, JSON output)
pub use serde_json::Value;
