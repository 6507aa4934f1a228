//! Feature modules
//!
//! Dependency order (leaves first):
//! parsing → matching → machine_extraction → code_change

pub mod code_change;
pub mod machine_extraction;
pub mod matching;
pub mod parsing;
