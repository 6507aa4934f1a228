//! Machine extraction use cases

pub mod extract_machine;

pub use extract_machine::{extract_machine, extract_machines, MachineExtraction};
