//! Program snapshot: the parsed files extraction resolves names against

use std::sync::Arc;

use ahash::AHashMap;
use rayon::prelude::*;

use crate::features::parsing::{Parser, SourceFile, TreeSitterParser};
use crate::shared::models::Result;

/// Immutable set of parsed files, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct Program {
    files: AHashMap<String, Arc<SourceFile>>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(file name, text)` pairs in parallel; the grammar follows the
    /// file extension
    pub fn from_sources<I, N, T>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let sources: Vec<(String, String)> = sources
            .into_iter()
            .map(|(name, text)| (name.into(), text.into()))
            .collect();

        let files = sources
            .par_iter()
            .map(|(name, text)| TreeSitterParser::for_path(name).parse(text, name))
            .collect::<Result<Vec<SourceFile>>>()?;

        let mut program = Self::new();
        for file in files {
            program.insert(file);
        }
        Ok(program)
    }

    /// Add or replace a file
    pub fn insert(&mut self, file: SourceFile) {
        self.files.insert(file.file_name.clone(), Arc::new(file));
    }

    pub fn with_file(mut self, file: SourceFile) -> Self {
        self.insert(file);
        self
    }

    pub fn file(&self, file_name: &str) -> Option<Arc<SourceFile>> {
        self.files.get(file_name).cloned()
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.files.contains_key(file_name)
    }

    /// File names in sorted order
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
