//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter grammar dependency lives.

use tree_sitter::Parser as TSParser;

use super::languages::typescript::uses_tsx_grammar;
use crate::features::parsing::domain::{SourceFile, SourceLanguage};
use crate::features::parsing::ports::Parser;
use crate::shared::models::{ExtractorError, Result};

/// Tree-sitter based parser
pub struct TreeSitterParser {
    language: SourceLanguage,
}

impl TreeSitterParser {
    /// Create a TypeScript parser (also handles plain JavaScript)
    pub fn typescript() -> Self {
        Self {
            language: SourceLanguage::TypeScript,
        }
    }

    /// Create a TSX parser (also handles JSX)
    pub fn tsx() -> Self {
        Self {
            language: SourceLanguage::Tsx,
        }
    }

    /// Pick the grammar from a file name's extension
    pub fn for_path(file_path: &str) -> Self {
        let ext = std::path::Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if uses_tsx_grammar(&ext) {
            Self::tsx()
        } else {
            Self::typescript()
        }
    }

    /// Get the tree-sitter language
    fn get_ts_language(&self) -> tree_sitter::Language {
        match self.language {
            SourceLanguage::TypeScript => tree_sitter_typescript::language_typescript(),
            SourceLanguage::Tsx => tree_sitter_typescript::language_tsx(),
        }
    }
}

impl Parser for TreeSitterParser {
    fn parse(&self, source: &str, file_path: &str) -> Result<SourceFile> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.get_ts_language())
            .map_err(|e| ExtractorError::internal(format!("grammar rejected: {}", e)).with_source(e))?;

        let tree = parser.parse(source, None).ok_or_else(|| {
            ExtractorError::parse("parser produced no tree").with_file(file_path)
        })?;

        Ok(SourceFile::new(
            file_path.to_string(),
            source.to_string(),
            tree,
            self.language,
        ))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        match self.language {
            SourceLanguage::TypeScript => matches!(ext, "ts" | "mts" | "cts" | "js" | "mjs" | "cjs"),
            SourceLanguage::Tsx => uses_tsx_grammar(ext),
        }
    }

    fn language_name(&self) -> &'static str {
        self.language.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typescript_call() {
        let parser = TreeSitterParser::typescript();
        let result = parser.parse("const m = createMachine({});", "machine.ts");

        assert!(result.is_ok());
        let file = result.unwrap();
        assert!(!file.has_errors());
        assert_eq!(file.root().kind(), "program");
    }

    #[test]
    fn test_grammar_from_path() {
        assert_eq!(TreeSitterParser::for_path("a/b.tsx").language_name(), "tsx");
        assert_eq!(TreeSitterParser::for_path("a/b.ts").language_name(), "typescript");
        assert_eq!(TreeSitterParser::for_path("noext").language_name(), "typescript");
        assert!(TreeSitterParser::tsx().supports_extension("jsx"));
        assert!(!TreeSitterParser::typescript().supports_extension("tsx"));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let parser = TreeSitterParser::typescript();
        let a = parser.parse("createMachine({})", "a.ts").unwrap();
        let b = parser.parse("createMachine({})", "b.ts").unwrap();
        let c = parser.parse("createMachine({ id: 'x' })", "a.ts").unwrap();
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
    }
}
