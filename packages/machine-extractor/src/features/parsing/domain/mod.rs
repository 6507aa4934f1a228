//! Parsing domain models

mod source_file;

pub use source_file::{SourceFile, SourceLanguage};
