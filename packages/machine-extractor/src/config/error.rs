//! Errors raised while loading or validating an `ExtractorConfig`

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::shared::models::ExtractorError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config: '{field}' is {value}, expected {}..={}", .allowed.start(), .allowed.end())]
    Range {
        field: &'static str,
        value: usize,
        allowed: RangeInclusive<usize>,
    },

    #[error("config: 'version' is required (current schema: version: 1)")]
    MissingVersion,

    #[error("config: schema version {found} is not supported (known: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Nothing left to recognize machine calls by
    #[error("config: 'factory_names' is empty")]
    EmptyFactoryNames,

    /// A name that can never be a callee, like `a.b`
    #[error("config: factory name '{0}' is not an identifier")]
    InvalidFactoryName(String),

    #[error("config: cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// `Range` error when `value` is outside `allowed`
    pub fn check_range(field: &'static str, value: usize, allowed: RangeInclusive<usize>) -> ConfigResult<()> {
        if allowed.contains(&value) {
            Ok(())
        } else {
            Err(Self::Range { field, value, allowed })
        }
    }
}

impl From<ConfigError> for ExtractorError {
    fn from(err: ConfigError) -> Self {
        ExtractorError::config(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigError::check_range("formatting.indent_width", 4, 1..=8).is_ok());
        let err = ConfigError::check_range("formatting.indent_width", 0, 1..=8).unwrap_err();
        assert_eq!(err.to_string(), "config: 'formatting.indent_width' is 0, expected 1..=8");
    }

    #[test]
    fn test_into_extractor_error() {
        let err = ExtractorError::from(ConfigError::MissingVersion);
        assert_eq!(err.kind, crate::shared::models::ErrorKind::Config);
        assert!(err.message.contains("version"));
    }
}
