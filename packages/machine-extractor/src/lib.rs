/*
 * Machine Extractor - state machine definitions as graphs, and back
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, TextRange, OrderedMap, errors)
 * - config/      : Extractor configuration (YAML + builder)
 * - features/    : Vertical slices (parsing → matching → machine_extraction → code_change)
 * - pipeline/    : Program snapshot and project orchestration
 *
 * Extraction never fails on a malformed machine: problems are returned as
 * data next to a best-effort digraph. Patching is all-or-nothing per batch.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Configuration system
pub mod config;

/// Feature modules
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, ExtractorConfig, QuoteStyle};
pub use features::code_change::{
    apply_text_edits, compute_edits, patch_machine, MachinePatch, PatchError, RawPatch, TextEdit,
};
pub use features::machine_extraction::{
    extract_machine, extract_machines, Digraph, Edge, ExtractionError, ExtractionErrorKind,
    Implementation, JsonItem, MachineCallSite, MachineExtraction, Node, NodeData, StateType,
};
pub use features::parsing::{Parser, SourceFile, TreeSitterParser};
pub use pipeline::{Program, Project};
pub use shared::models::{ErrorKind, ExtractorError, LineIndex, Result, Span, TextRange};
