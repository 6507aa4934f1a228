//! Project tests - extraction cache, patching and program updates
//!
//! Drives the `Project` the way an editor integration would: extract, patch,
//! apply the edits, hand the new text back and extract again.

use std::io::Write;

use machine_extractor::config::ExtractorConfig;
use machine_extractor::features::code_change::{apply_text_edits, PathSegment, RawPatch};
use machine_extractor::pipeline::{Program, Project};
use machine_extractor::shared::models::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::NamedTempFile;

const TOGGLE: &str = "import { createMachine } from 'xstate';

export const toggle = createMachine({
  id: 'toggle',
  initial: 'inactive',
  states: {
    inactive: { on: { TOGGLE: 'active' } },
    active: { on: { TOGGLE: 'inactive' } }
  }
});
";

const FETCH: &str = "const fetcher = createMachine({
  initial: 'idle',
  states: {
    idle: { on: { FETCH: 'loading' } },
    loading: {
      invoke: { src: 'fetchData', onDone: 'done', onError: 'idle' }
    },
    done: { type: 'final' }
  }
});
";

fn project() -> Project {
    let program = Program::from_sources([("toggle.ts", TOGGLE), ("fetch.tsx", FETCH), ("empty.js", "export {};\n")]).unwrap();
    Project::new(program, ExtractorConfig::default())
}

// ═══════════════════════════════════════════════════════════════════════════
// Extraction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn extract_all_files() {
    let project = project();
    let results = project.extract_all();
    let counts: Vec<(String, usize)> = results
        .iter()
        .map(|(name, machines)| (name.clone(), machines.as_ref().unwrap().len()))
        .collect();
    assert_eq!(
        counts,
        vec![("empty.js".to_string(), 0), ("fetch.tsx".to_string(), 1), ("toggle.ts".to_string(), 1)]
    );
    assert_eq!(project.cached_files(), 3);
}

#[test]
fn machines_are_cached_per_content() {
    let project = project();
    let first = project.get_machines_in_file("fetch.tsx").unwrap();
    let second = project.get_machines_in_file("fetch.tsx").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let machine = project.get_machine("fetch.tsx", 0).unwrap();
    assert!(machine.errors.is_empty(), "{:?}", machine.errors);
    assert_eq!(
        machine.digraph.transitions("(machine).loading", "xstate.done.actor.(machine).loading:invocation[0]")[0]
            .resolved_targets,
        vec!["(machine).done".to_string()]
    );
}

#[test]
fn missing_file_and_machine() {
    let project = project();
    let err = project.get_machines_in_file("nope.ts").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Extraction));

    let err = project.get_machine("empty.js", 0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Extraction));
    assert_eq!(err.file_path.as_deref(), Some("empty.js"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Patch round trip
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn patch_apply_and_reextract() {
    let project = project();
    let patches: Vec<RawPatch> = serde_json::from_value(json!([
        { "op": "add", "path": ["nodes", "(machine).paused"], "value": { "parentId": "(machine)", "data": { "key": "paused" } } },
        { "op": "add", "path": ["edges", "(machine).inactive#TOGGLE[0]", "data", "actions", 0], "value": "notify" },
        { "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": "active" }
    ]))
    .unwrap();

    let edits = project.apply_patches("toggle.ts", 0, &patches).unwrap();
    let updated = apply_text_edits(TOGGLE, &edits).unwrap();
    assert!(updated.starts_with("import { createMachine } from 'xstate';\n"));

    let program = Program::from_sources([("toggle.ts", updated.as_str()), ("fetch.tsx", FETCH), ("empty.js", "export {};\n")]).unwrap();
    project.extract_all();
    assert_eq!(project.update_program(program), 1);
    assert_eq!(project.cached_files(), 2);

    let machine = project.get_machine("toggle.ts", 0).unwrap();
    let graph = &machine.digraph;
    assert!(machine.errors.is_empty(), "{:?}", machine.errors);
    assert_eq!(graph.root_node().unwrap().data.initial.as_deref(), Some("active"));
    assert!(graph.node("(machine).paused").is_some());

    let toggle = graph.edge("(machine).inactive#TOGGLE[0]").unwrap();
    assert_eq!(toggle.data.actions[0].name, "notify");
    assert_eq!(toggle.resolved_targets, vec!["(machine).active".to_string()]);

    // Same batch again: only the node addition is refused
    let err = project.apply_patches("toggle.ts", 0, &patches[..1]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Patch));
    assert!(project.apply_patches("toggle.ts", 0, &patches[2..]).unwrap().is_empty());
}

#[test]
fn patching_a_missing_machine_fails() {
    let project = project();
    let patches = vec![RawPatch::remove(vec!["nodes".into(), "(machine).a".into()])];
    let err = project.apply_patches("empty.js", 0, &patches).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Extraction));
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn yaml_config_drives_factories_and_formatting() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "version: 1\nfactory_names: [defineMachine]\nformatting:\n  indent_width: 4\n  quote: single"
    )
    .unwrap();
    let config = ExtractorConfig::from_yaml(file.path().to_str().unwrap()).unwrap();

    let source = "const a = createMachine({});\nconst b = defineMachine({});\n";
    let program = Program::from_sources([("custom.ts", source)]).unwrap();
    let project = Project::new(program, config);

    let machines = project.find_machines("custom.ts").unwrap();
    assert_eq!(machines.len(), 1);
    assert_eq!(machines[0].callee_name, "defineMachine");

    let patches = vec![RawPatch::add(
        vec!["nodes".into(), "(machine)".into(), "data".into(), "entry".into(), PathSegment::Index(0)],
        json!("start"),
    )];
    let edits = project.apply_patches("custom.ts", 0, &patches).unwrap();
    assert_eq!(
        apply_text_edits(source, &edits).unwrap(),
        "const a = createMachine({});\nconst b = defineMachine({\n    entry: 'start'\n});\n"
    );
}

#[test]
fn invalid_yaml_config_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "version: 1\nformatting:\n  indent_width: 0").unwrap();
    assert!(ExtractorConfig::from_yaml(file.path().to_str().unwrap()).is_err());

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "factory_names: [createMachine]").unwrap();
    assert!(ExtractorConfig::from_yaml(file.path().to_str().unwrap()).is_err());
}
