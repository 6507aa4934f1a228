//! Machine extraction infrastructure
//!
//! Extractors that read tree-sitter nodes into the digraph model.

pub mod actions;
pub mod literals;
pub mod machine_call;
pub mod state_node;
pub mod target_resolver;
pub mod transitions;

pub use machine_call::{find_machine_calls, machine_call_at, MachineCall};
pub use state_node::extract_state_node;
pub use target_resolver::{resolve_target, resolve_targets};
