//! Machine Extraction Feature
//!
//! Turns machine definition calls into digraphs.
//!
//! ## Structure
//! - `domain/` - Digraph, implementations, AST paths, errors, lexical tree
//! - `ports/` - ExtractionContext accumulator
//! - `infrastructure/` - call matcher, action/state/transition extractors, target resolver
//! - `application/` - per-file and per-machine extraction
//!
//! ## Usage
//! ```ignore
//! let file = TreeSitterParser::typescript().parse(source, "machine.ts")?;
//! for machine in extract_machines(&file, &ExtractorConfig::default()) {
//!     println!("{} nodes, {} errors", machine.digraph.nodes.len(), machine.errors.len());
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{extract_machine, extract_machines, MachineExtraction};
pub use domain::{
    AstPath, Digraph, Edge, ExtractionError, ExtractionErrorKind, Implementation, JsonItem,
    MachineCallSite, Node, NodeData, StateType, SyntaxLocations,
};
pub use infrastructure::{find_machine_calls, MachineCall};
