//! Extractor configuration
//!
//! Two ways in:
//! - Builder: `ExtractorConfig::default().with_factory_names(..).with_indent_width(4)`
//! - YAML (versioned schema):
//!
//! ```yaml
//! version: 1
//! factory_names: [createMachine, Machine, createTestMachine]
//! formatting:
//!   indent_width: 2
//!   quote: double
//! ```

pub mod error;
pub mod extractor_config;

pub use error::{ConfigError, ConfigResult};
pub use extractor_config::{ConfigFileV1, ExtractorConfig, FormattingConfig, QuoteStyle};
