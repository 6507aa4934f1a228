//! Extract machines from a parsed file
//!
//! One extraction per machine call: walk the root config, resolve targets,
//! hand back the digraph, the errors and the recorded syntax locations.

use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::features::machine_extraction::domain::{
    Digraph, ExtractionError, MachineCallSite, SyntaxLocations,
};
use crate::features::machine_extraction::infrastructure::{
    extract_state_node, find_machine_calls, resolve_targets, MachineCall,
};
use crate::features::machine_extraction::ports::ExtractionContext;
use crate::features::parsing::SourceFile;

/// Result of extracting one machine
#[derive(Debug, Clone)]
pub struct MachineExtraction {
    pub call_site: MachineCallSite,
    pub digraph: Digraph,
    pub errors: Vec<ExtractionError>,
    pub locations: SyntaxLocations,
}

impl MachineExtraction {
    pub fn index(&self) -> usize {
        self.call_site.index
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Extract the machine defined by `call`
pub fn extract_machine(file: &SourceFile, call: &MachineCall<'_>, config: &ExtractorConfig) -> MachineExtraction {
    let mut ctx = ExtractionContext::new(file, config, call.node);
    extract_state_node(&mut ctx, call.config(), None);
    resolve_targets(&mut ctx);

    let (digraph, errors, locations) = ctx.finish();
    debug!(
        file = %file.file_name,
        index = call.index,
        nodes = digraph.nodes.len(),
        edges = digraph.edges.len(),
        errors = errors.len(),
        "machine extracted"
    );

    MachineExtraction {
        call_site: call.site(),
        digraph,
        errors,
        locations,
    }
}

/// Extract every machine in the file, in source order
pub fn extract_machines(file: &SourceFile, config: &ExtractorConfig) -> Vec<MachineExtraction> {
    let calls = find_machine_calls(file, config);
    info!(file = %file.file_name, machines = calls.len(), "machine calls found");
    calls
        .iter()
        .map(|call| extract_machine(file, call, config))
        .collect()
}
