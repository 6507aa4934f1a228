//! Code change domain: patches in, text edits out

pub mod error;
pub mod patch;
pub mod text_edit;

pub use error::{PatchError, PatchResult};
pub use patch::{
    ActionSlot, DataPatch, EdgePatch, MachinePatch, NodePatch, PatchOp, PathSegment, RawPatch,
};
pub use text_edit::{apply_text_edits, normalize_edits, TextEdit};
