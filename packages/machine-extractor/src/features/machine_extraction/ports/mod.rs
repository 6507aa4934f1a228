//! Machine extraction ports

pub mod extraction_context;

pub use extraction_context::ExtractionContext;
