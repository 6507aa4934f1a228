//! Patch tests - structural patches to text edits
//!
//! Each test parses a source, patches one machine, applies the edits and
//! checks the new text. Re-extracting the result closes the loop.

use machine_extractor::config::ExtractorConfig;
use machine_extractor::features::code_change::{apply_text_edits, patch_machine, PatchError, RawPatch, TextEdit};
use machine_extractor::features::machine_extraction::{extract_machines, MachineExtraction};
use machine_extractor::features::parsing::{Parser, SourceFile, TreeSitterParser};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn parse(source: &str) -> SourceFile {
    TreeSitterParser::typescript().parse(source, "machine.ts").unwrap()
}

fn raw(patches: Value) -> Vec<RawPatch> {
    serde_json::from_value(patches).unwrap()
}

fn edits_for(source: &str, patches: Value) -> Result<Vec<TextEdit>, PatchError> {
    patch_machine(&parse(source), 0, &raw(patches), &ExtractorConfig::default())
}

fn apply(source: &str, patches: Value) -> String {
    let edits = edits_for(source, patches).unwrap();
    apply_text_edits(source, &edits).unwrap()
}

fn extract(source: &str) -> MachineExtraction {
    extract_machines(&parse(source), &ExtractorConfig::default())
        .into_iter()
        .next()
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Action scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn add_entry_to_empty_root() {
    let out = apply(
        "createMachine({})",
        json!([{ "op": "add", "path": ["nodes", "(machine)", "data", "entry", 0], "value": "doStuff" }]),
    );
    assert_eq!(out, "createMachine({\n  entry: \"doStuff\"\n})");
}

#[test]
fn add_entry_promotes_single_value() {
    let out = apply(
        "createMachine({ entry: 'bark' })",
        json!([{ "op": "add", "path": ["nodes", "(machine)", "data", "entry", 1], "value": "doStuff" }]),
    );
    assert_eq!(out, "createMachine({ entry: ['bark', \"doStuff\"] })");
}

#[test]
fn add_entry_to_nested_state() {
    let out = apply(
        "createMachine({ states: { a: {} } })",
        json!([{ "op": "add", "path": ["nodes", "(machine).a", "data", "entry", 0], "value": "doStuff" }]),
    );
    assert_eq!(out, "createMachine({ states: { a: {\n  entry: \"doStuff\"\n} } })");

    let machine = extract(&out);
    assert_eq!(machine.digraph.node("(machine).a").unwrap().data.entry[0].name, "doStuff");
}

#[test]
fn add_entry_after_malformed_creator() {
    let source = "createMachine({ entry: [assign(), 'a'] })";
    let machine = extract(source);
    assert_eq!(machine.digraph.root_node().unwrap().data.entry.len(), 2);

    let out = apply(
        source,
        json!([{ "op": "add", "path": ["nodes", "(machine)", "data", "entry", 1], "value": "x" }]),
    );
    assert_eq!(out, "createMachine({ entry: [assign(), \"x\", 'a'] })");
}

#[test]
fn add_entry_to_dotted_state_key() {
    let out = apply(
        "createMachine({ states: { 'a.b': {}, a: { states: { b: {} } } } })",
        json!([{ "op": "add", "path": ["nodes", r"(machine).a\.b", "data", "entry", 0], "value": "go" }]),
    );
    assert_eq!(
        out,
        "createMachine({ states: { 'a.b': {\n  entry: \"go\"\n}, a: { states: { b: {} } } } })"
    );
}

#[test]
fn add_action_to_shorthand_transition() {
    let source = "createMachine({ on: { FOO: '.a' }, states: { a: {} } })";
    let out = apply(
        source,
        json!([{ "op": "add", "path": ["edges", "(machine)#FOO[0]", "data", "actions", 0], "value": "doStuff" }]),
    );
    assert_eq!(
        out,
        "createMachine({ on: { FOO: {\n  target: '.a',\n  actions: \"doStuff\"\n} }, states: { a: {} } })"
    );

    let machine = extract(&out);
    let edge = machine.digraph.edge("(machine)#FOO[0]").unwrap();
    assert_eq!(edge.resolved_targets, vec!["(machine).a".to_string()]);
    assert_eq!(edge.data.actions[0].name, "doStuff");
}

#[test]
fn add_actions_to_guarded_alternative() {
    let source = "createMachine({\n  on: {\n    GO: [\n      { target: '.a', guard: 'ok' },\n      '.b'\n    ]\n  },\n  states: { a: {}, b: {} }\n})";
    let out = apply(
        source,
        json!([
            { "op": "add", "path": ["edges", "(machine)#GO[0]", "data", "actions", 0], "value": "first" },
            { "op": "add", "path": ["edges", "(machine)#GO[1]", "data", "actions", 0], "value": "second" }
        ]),
    );
    assert_eq!(
        out,
        "createMachine({\n  on: {\n    GO: [\n      { target: '.a', guard: 'ok', actions: \"first\" },\n      {\n        target: '.b',\n        actions: \"second\"\n      }\n    ]\n  },\n  states: { a: {}, b: {} }\n})"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Batches
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mixed_batch_on_one_machine() {
    let source = "createMachine({\n  initial: 'a',\n  states: {\n    a: { on: { NEXT: 'b' } },\n    b: {}\n  }\n})";
    let out = apply(
        source,
        json!([
            { "op": "add", "path": ["nodes", "(machine).c"], "value": { "parentId": "(machine)", "data": { "key": "c" } } },
            { "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": "b" },
            { "op": "replace", "path": ["nodes", "(machine).b", "data", "type"], "value": "final" },
            { "op": "add", "path": ["nodes", "(machine).b", "data", "exit", 0], "value": "cleanup" }
        ]),
    );
    assert_eq!(
        out,
        "createMachine({\n  initial: \"b\",\n  states: {\n    a: { on: { NEXT: 'b' } },\n    b: {\n      type: \"final\",\n      exit: \"cleanup\"\n    },\n    c: {}\n  }\n})"
    );

    let machine = extract(&out);
    assert!(machine.errors.is_empty());
    assert_eq!(machine.digraph.nodes.len(), 4);
}

#[test]
fn failing_patch_rejects_whole_batch() {
    let result = edits_for(
        "createMachine({ states: { a: {} } })",
        json!([
            { "op": "add", "path": ["nodes", "(machine).a", "data", "entry", 0], "value": "fine" },
            { "op": "replace", "path": ["nodes", "(machine).missing", "data", "initial"], "value": "x" }
        ]),
    );
    assert!(matches!(result, Err(PatchError::UnknownNode(id)) if id == "(machine).missing"));
}

#[test]
fn second_machine_in_file() {
    let source = "const a = createMachine({});\nconst b = createMachine({ id: 'b' });";
    let edits = patch_machine(
        &parse(source),
        1,
        &raw(json!([{ "op": "replace", "path": ["nodes", "(machine)", "data", "type"], "value": "parallel" }])),
        &ExtractorConfig::default(),
    )
    .unwrap();
    assert_eq!(
        apply_text_edits(source, &edits).unwrap(),
        "const a = createMachine({});\nconst b = createMachine({ type: \"parallel\", id: 'b' });"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Idempotence and round-trip
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn replaying_value_replacements_is_a_no_op() {
    let patches = json!([
        { "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": "b" },
        { "op": "replace", "path": ["nodes", "(machine).b", "data", "type"], "value": "final" },
        { "op": "replace", "path": ["nodes", "(machine).a", "data", "key"], "value": "first" },
        { "op": "replace", "path": ["data", "context", "count"], "value": 3 }
    ]);
    let source = "createMachine({ context: { count: 0 }, initial: 'a', states: { a: {}, b: {} } })";
    let once = apply(source, patches.clone());

    let replay = json!([
        { "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": "b" },
        { "op": "replace", "path": ["nodes", "(machine).b", "data", "type"], "value": "final" },
        { "op": "replace", "path": ["nodes", "(machine).first", "data", "key"], "value": "first" },
        { "op": "replace", "path": ["data", "context", "count"], "value": 3 }
    ]);
    assert!(edits_for(&once, replay).unwrap().is_empty());
}

#[test]
fn identical_values_leave_source_untouched() {
    let source = "createMachine({\n  initial: 'idle',\n  context: { retries: 2, label: 'x' },\n  states: {\n    idle: { type: 'final' },\n    h: { type: 'history', history: 'deep' }\n  }\n})";
    let machine = extract(source);
    let root = machine.digraph.root_node().unwrap();

    let patches = json!([
        { "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": root.data.initial },
        { "op": "replace", "path": ["nodes", "(machine).idle", "data", "type"], "value": "final" },
        { "op": "replace", "path": ["nodes", "(machine).h", "data", "history"], "value": "deep" },
        { "op": "replace", "path": ["data", "context", "retries"], "value": 2 },
        { "op": "replace", "path": ["data", "context", "label"], "value": "x" }
    ]);
    assert_eq!(apply(source, patches), source);
}

#[test]
fn only_targeted_ranges_change() {
    let source = "// header\nconst m = createMachine({\n  initial: 'a',\n  states: { a: {}, b: {} }\n});\n// footer\n";
    let edits = edits_for(
        source,
        json!([{ "op": "replace", "path": ["nodes", "(machine)", "data", "initial"], "value": "b" }]),
    )
    .unwrap();
    assert_eq!(edits.len(), 1);

    let out = apply_text_edits(source, &edits).unwrap();
    let edit = &edits[0];
    assert_eq!(&source[..edit.start], &out[..edit.start]);
    assert_eq!(&source[edit.end..], &out[edit.start + edit.new_text.len()..]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Rejections
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unsupported_remove_paths() {
    let result = edits_for(
        "createMachine({ entry: 'a' })",
        json!([{ "op": "remove", "path": ["nodes", "(machine)", "data", "entry", 0] }]),
    );
    assert!(matches!(result, Err(PatchError::Unsupported { .. })));
}

#[test]
fn dynamic_config_has_no_location() {
    let result = edits_for(
        "createMachine(makeConfig())",
        json!([{ "op": "add", "path": ["nodes", "(machine)", "data", "entry", 0], "value": "x" }]),
    );
    assert!(matches!(result, Err(PatchError::MissingLocation(_))));
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

fn action_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,8}"
}

proptest! {
    /// Property: any batch of action additions yields disjoint, applicable
    /// edits and every action shows up after re-extraction
    #[test]
    fn prop_action_batches_are_disjoint(
        entries in prop::collection::vec((0usize..4, action_name()), 0..5),
        exits in prop::collection::vec((0usize..4, action_name()), 0..5),
        edge_actions in prop::collection::vec((0usize..4, action_name()), 0..5),
    ) {
        let source = "createMachine({\n  entry: 'start',\n  on: { GO: '.a' },\n  states: { a: { exit: ['x', 'y'] } }\n})";
        let mut patches = Vec::new();
        for (index, name) in &entries {
            patches.push(json!({ "op": "add", "path": ["nodes", "(machine)", "data", "entry", index], "value": name }));
        }
        for (index, name) in &exits {
            patches.push(json!({ "op": "add", "path": ["nodes", "(machine).a", "data", "exit", index], "value": name }));
        }
        for (index, name) in &edge_actions {
            patches.push(json!({ "op": "add", "path": ["edges", "(machine)#GO[0]", "data", "actions", index], "value": name }));
        }

        let edits = edits_for(source, Value::Array(patches)).unwrap();
        for pair in edits.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }

        let out = apply_text_edits(source, &edits).unwrap();
        let machine = extract(&out);
        prop_assert!(machine.errors.is_empty());
        let graph = &machine.digraph;
        prop_assert_eq!(graph.root_node().unwrap().data.entry.len(), 1 + entries.len());
        prop_assert_eq!(graph.node("(machine).a").unwrap().data.exit.len(), 2 + exits.len());
        prop_assert_eq!(graph.edge("(machine)#GO[0]").unwrap().data.actions.len(), edge_actions.len());
    }
}
