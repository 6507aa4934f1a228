//! Extractor configuration model, YAML I/O and validation

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

/// Factory names recognized when no configuration is given:
/// new machine, legacy machine, test machine.
pub const DEFAULT_FACTORY_NAMES: [&str; 3] = ["createMachine", "Machine", "createTestMachine"];

const SUPPORTED_VERSIONS: [u32; 1] = [1];
const MIN_INDENT_WIDTH: usize = 1;
const MAX_INDENT_WIDTH: usize = 8;

/// Quote character used for string literals the patch engine writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Double,
    Single,
}

/// Formatting of synthesized source text
///
/// Only affects text the patch engine creates; existing text is never
/// reformatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormattingConfig {
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    #[serde(default = "default_quote")]
    pub quote: QuoteStyle,
}

fn default_indent_width() -> usize {
    2
}

fn default_quote() -> QuoteStyle {
    QuoteStyle::Double
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            quote: default_quote(),
        }
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatting: Option<FormattingConfig>,
}

/// Extractor configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Callee names that mark a machine definition call
    pub factory_names: Vec<String>,

    pub formatting: FormattingConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            factory_names: DEFAULT_FACTORY_NAMES.iter().map(|s| s.to_string()).collect(),
            formatting: FormattingConfig::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_factory_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factory_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.formatting.indent_width = width;
        self
    }

    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.formatting.quote = quote;
        self
    }

    pub fn is_factory_name(&self, name: &str) -> bool {
        self.factory_names.iter().any(|n| n == name)
    }

    /// One level of indentation
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.formatting.indent_width)
    }

    /// Render `value` as a string literal in the configured quote style
    pub fn quote_string(&self, value: &str) -> String {
        let quote = match self.formatting.quote {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        };
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.factory_names.is_empty() {
            return Err(ConfigError::EmptyFactoryNames);
        }

        if let Some(bad) = self.factory_names.iter().find(|n| !is_identifier(n)) {
            return Err(ConfigError::InvalidFactoryName(bad.clone()));
        }

        ConfigError::check_range(
            "formatting.indent_width",
            self.formatting.indent_width,
            MIN_INDENT_WIDTH..=MAX_INDENT_WIDTH,
        )
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(names) = file.factory_names {
            config.factory_names = names;
        }
        if let Some(formatting) = file.formatting {
            config.formatting = formatting;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            factory_names: Some(self.factory_names.clone()),
            formatting: Some(self.formatting.clone()),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_factory_names() {
        let config = ExtractorConfig::default();
        assert!(config.is_factory_name("createMachine"));
        assert!(config.is_factory_name("Machine"));
        assert!(config.is_factory_name("createTestMachine"));
        assert!(!config.is_factory_name("setup"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ExtractorConfig::default()
            .with_indent_width(4)
            .with_quote(QuoteStyle::Single);

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("indent_width: 4"));
        assert!(yaml.contains("quote: single"));

        let loaded = ExtractorConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_loading_from_file() {
        let yaml_content = r#"
version: 1
factory_names: [createMachine, setupMachine]
formatting:
  indent_width: 4
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        let path = temp_file.path().to_str().unwrap();

        let config = ExtractorConfig::from_yaml(path).unwrap();
        assert!(config.is_factory_name("setupMachine"));
        assert!(!config.is_factory_name("Machine"));
        assert_eq!(config.formatting.indent_width, 4);
        assert_eq!(config.formatting.quote, QuoteStyle::Double);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = ExtractorConfig::from_yaml_str("factory_names: [createMachine]\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = ExtractorConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = ExtractorConfig::from_yaml_str("version: 1\nfactories: []\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let empty = ExtractorConfig::default().with_factory_names(Vec::<String>::new());
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyFactoryNames)));

        let dotted = ExtractorConfig::default().with_factory_names(["xstate.createMachine"]);
        assert!(matches!(
            dotted.validate(),
            Err(ConfigError::InvalidFactoryName(_))
        ));

        let wide = ExtractorConfig::default().with_indent_width(12);
        assert!(matches!(wide.validate(), Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_quote_string_escapes() {
        let double = ExtractorConfig::default();
        assert_eq!(double.quote_string("doStuff"), "\"doStuff\"");
        assert_eq!(double.quote_string("say \"hi\""), "\"say \\\"hi\\\"\"");

        let single = ExtractorConfig::default().with_quote(QuoteStyle::Single);
        assert_eq!(single.quote_string("it's"), "'it\\'s'");
        assert_eq!(single.quote_string("a\"b"), "'a\"b'");
    }
}
