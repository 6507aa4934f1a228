//! Code Change Feature
//!
//! Structural patches against an extracted digraph become minimal text
//! edits against the original source.
//!
//! ## Structure
//! - `domain/` - RawPatch / MachinePatch, TextEdit, PatchError
//! - `infrastructure/` - object literal layout, per-batch edit plan
//! - `application/` - compute_edits, patch_machine
//!
//! ## Usage
//! ```ignore
//! let raw: Vec<RawPatch> = serde_json::from_str(patches_json)?;
//! let edits = patch_machine(&file, 0, &raw, &config)?;
//! let updated = apply_text_edits(&file.text, &edits)?;
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports
pub use application::{compute_edits, patch_machine};
pub use domain::{
    apply_text_edits, ActionSlot, DataPatch, EdgePatch, MachinePatch, NodePatch, PatchError, PatchOp,
    PatchResult, PathSegment, RawPatch, TextEdit,
};
