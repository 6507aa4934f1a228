//! Pipeline: program snapshot and project orchestration

pub mod program;
pub mod project;

pub use program::Program;
pub use project::Project;
