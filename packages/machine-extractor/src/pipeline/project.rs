//! Project orchestrator
//!
//! Per-file cache of machine extractions over the active `Program`.
//!
//! - Reads go through a `DashMap`, so different files never contend.
//! - The program sits behind a `RwLock` and is swapped whole by
//!   `update_program`; only files whose fingerprint changed (or that
//!   vanished) lose their cache entry.
//! - Patching always re-extracts the machine from the current snapshot and
//!   finds it again by position, never by a node from an older tree.
//!
//! Operations on the same file should be serialized by the caller.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info};

use super::program::Program;
use crate::config::ExtractorConfig;
use crate::features::code_change::{patch_machine, PatchError, RawPatch, TextEdit};
use crate::features::machine_extraction::{
    extract_machines, find_machine_calls, MachineCallSite, MachineExtraction,
};
use crate::features::parsing::SourceFile;
use crate::shared::models::{ExtractorError, Result};

#[derive(Debug, Clone)]
struct CachedFile {
    fingerprint: blake3::Hash,
    machines: Arc<Vec<MachineExtraction>>,
}

pub struct Project {
    config: ExtractorConfig,
    program: RwLock<Arc<Program>>,
    cache: DashMap<String, CachedFile>,
}

impl Project {
    pub fn new(program: Program, config: ExtractorConfig) -> Self {
        Self {
            config,
            program: RwLock::new(Arc::new(program)),
            cache: DashMap::new(),
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The active program snapshot
    pub fn program(&self) -> Arc<Program> {
        Arc::clone(&self.program.read())
    }

    fn source_file(&self, file_name: &str) -> Result<Arc<SourceFile>> {
        self.program()
            .file(file_name)
            .ok_or_else(|| ExtractorError::from(PatchError::FileNotFound(file_name.to_string())))
    }

    /// Machine call sites of a file, without extracting them
    pub fn find_machines(&self, file_name: &str) -> Result<Vec<MachineCallSite>> {
        let file = self.source_file(file_name)?;
        Ok(find_machine_calls(&file, &self.config)
            .iter()
            .map(|call| call.site())
            .collect())
    }

    /// Every machine of a file, extracted once per file content
    pub fn get_machines_in_file(&self, file_name: &str) -> Result<Arc<Vec<MachineExtraction>>> {
        let file = self.source_file(file_name)?;
        if let Some(cached) = self.cache.get(file_name) {
            if cached.fingerprint == file.fingerprint {
                debug!(file = file_name, "machine cache hit");
                return Ok(Arc::clone(&cached.machines));
            }
        }

        let machines = Arc::new(extract_machines(&file, &self.config));
        self.cache.insert(
            file_name.to_string(),
            CachedFile {
                fingerprint: file.fingerprint,
                machines: Arc::clone(&machines),
            },
        );
        Ok(machines)
    }

    /// One machine of a file by position
    pub fn get_machine(&self, file_name: &str, index: usize) -> Result<MachineExtraction> {
        self.get_machines_in_file(file_name)?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                PatchError::MachineNotFound {
                    file: file_name.to_string(),
                    index,
                }
                .into()
            })
    }

    /// Extract several files in parallel
    pub fn extract_files(&self, file_names: &[String]) -> Vec<(String, Result<Arc<Vec<MachineExtraction>>>)> {
        let results: Vec<(String, Result<Arc<Vec<MachineExtraction>>>)> = file_names
            .par_iter()
            .map(|name| (name.clone(), self.get_machines_in_file(name)))
            .collect();
        info!(files = results.len(), "files extracted");
        results
    }

    /// Extract every file of the program in parallel
    pub fn extract_all(&self) -> Vec<(String, Result<Arc<Vec<MachineExtraction>>>)> {
        let names = self.program().file_names();
        self.extract_files(&names)
    }

    /// Text edits for `patches` on machine `machine_index` of `file_name`
    ///
    /// Fails as a whole when the file or the machine is gone, or when any
    /// patch cannot be applied.
    pub fn apply_patches(&self, file_name: &str, machine_index: usize, patches: &[RawPatch]) -> Result<Vec<TextEdit>> {
        let file = self.source_file(file_name)?;
        let edits = patch_machine(&file, machine_index, patches, &self.config)
            .map_err(|e| ExtractorError::from(e).with_file(file_name))?;
        info!(
            file = file_name,
            index = machine_index,
            patches = patches.len(),
            edits = edits.len(),
            "patches applied"
        );
        Ok(edits)
    }

    /// Swap the active program; returns how many cached files were dropped
    pub fn update_program(&self, program: Program) -> usize {
        let program = Arc::new(program);
        *self.program.write() = Arc::clone(&program);

        let before = self.cache.len();
        self.cache.retain(|name, cached| {
            program
                .file(name)
                .map(|file| file.fingerprint == cached.fingerprint)
                .unwrap_or(false)
        });
        let dropped = before - self.cache.len();
        debug!(dropped, kept = self.cache.len(), "program updated");
        dropped
    }

    /// Forget a file's cached machines
    pub fn invalidate(&self, file_name: &str) {
        self.cache.remove(file_name);
    }

    /// Number of files with cached machines
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }
}
