//! Code change application

pub mod patch_machine;

pub use patch_machine::{compute_edits, patch_machine};
