//! Crate-level error
//!
//! Fatal failures only. Problems found inside a machine definition are not
//! errors in this sense: they are accumulated as `ExtractionError` data next
//! to a best-effort digraph.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No syntax tree for a source text
    Parse,
    /// File or machine call site missing from the program
    Extraction,
    /// Patch batch rejected
    Patch,
    Config,
    Io,
    /// Grammar or invariant failures that point at a bug
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Patch => "patch",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `[kind] message in file:line`; the location part only when known
#[derive(Debug, Error)]
#[error("[{kind}] {message}{}", location_suffix(.file_path, .line))]
pub struct ExtractorError {
    pub kind: ErrorKind,
    pub message: String,
    pub file_path: Option<String>,
    pub line: Option<u32>,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

fn location_suffix(file_path: &Option<String>, line: &Option<u32>) -> String {
    match (file_path, line) {
        (Some(file), Some(line)) => format!(" in {}:{}", file, line),
        (Some(file), None) => format!(" in {}", file),
        (None, _) => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;

impl ExtractorError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file_path: None,
            line: None,
            source: None,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Extraction, message)
    }

    pub fn patch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Patch, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_file(self, file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..self
        }
    }

    /// 1-based line within `file_path`
    pub fn with_line(self, line: u32) -> Self {
        Self {
            line: Some(line),
            ..self
        }
    }

    pub fn with_source(self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..self
        }
    }
}

impl From<std::io::Error> for ExtractorError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err.to_string()).with_source(err)
    }
}
