//! Extraction tests - digraphs from realistic machine definitions
//!
//! Covers the public extraction API end to end: call detection, the state
//! walk, actions, target resolution, error recovery and the JSON shape.

use machine_extractor::config::ExtractorConfig;
use machine_extractor::features::machine_extraction::{extract_machines, MachineExtraction};
use machine_extractor::features::parsing::{Parser, TreeSitterParser};
use machine_extractor::{Implementation, JsonItem, StateType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn extract_all(source: &str) -> Vec<MachineExtraction> {
    let file = TreeSitterParser::typescript().parse(source, "machine.ts").unwrap();
    extract_machines(&file, &ExtractorConfig::default())
}

fn extract(source: &str) -> MachineExtraction {
    extract_all(source).into_iter().next().expect("a machine")
}

const TRAFFIC_LIGHT: &str = r#"
import { createMachine, assign } from 'xstate';

enum Light {
  Green = 'green',
}

const TIMER = 'TIMER';

export const lightMachine = createMachine({
  id: 'light',
  initial: Light.Green,
  context: { elapsed: 0, direction: 'east' },
  states: {
    green: {
      entry: 'startTimer',
      on: {
        [TIMER]: 'ignored',
        TIMER: { target: 'yellow', actions: assign({ elapsed: 0 }) },
      },
    },
    yellow: {
      after: { 500: 'red' },
    },
    red: {
      initial: 'walk',
      states: {
        walk: { on: { COUNTDOWN: 'wait' } },
        wait: { on: { COUNTDOWN: 'stop' } },
        stop: { type: 'final' },
      },
      onDone: '#light.green',
    },
  },
}) as any;
"#;

// ═══════════════════════════════════════════════════════════════════════════
// Structure
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn traffic_light_structure() {
    let machine = extract(TRAFFIC_LIGHT);
    let graph = &machine.digraph;

    assert!(machine.errors.is_empty(), "{:?}", machine.errors);
    assert_eq!(graph.nodes.len(), 7);

    let root = graph.root_node().unwrap();
    assert_eq!(root.data.initial.as_deref(), Some("green"));
    assert_eq!(root.children.keys().collect::<Vec<_>>(), vec!["green", "yellow", "red"]);
    assert_eq!(
        graph.node_at(&["red", "stop"]).unwrap().data.state_type,
        StateType::Final
    );
    assert_eq!(graph.data.context.get("direction"), Some(&JsonItem::String("east".into())));
}

#[test]
fn traffic_light_transitions() {
    let machine = extract(TRAFFIC_LIGHT);
    let graph = &machine.digraph;

    let timer = graph.transitions("(machine).green", "TIMER");
    assert_eq!(timer.len(), 1);
    assert_eq!(timer[0].resolved_targets, vec!["(machine).yellow".to_string()]);
    assert_eq!(timer[0].data.actions[0].name, "xstate.assign");

    let after = graph.transitions("(machine).yellow", "xstate.after.500.(machine).yellow");
    assert_eq!(after[0].resolved_targets, vec!["(machine).red".to_string()]);

    let done = graph.transitions("(machine).red", "xstate.done.state.(machine).red");
    assert_eq!(done[0].resolved_targets, vec!["(machine).green".to_string()]);

    let countdown = graph.transitions("(machine).red.walk", "COUNTDOWN");
    assert_eq!(countdown[0].resolved_targets, vec!["(machine).red.wait".to_string()]);
}

#[test]
fn node_ids_are_unique_and_parented() {
    let machine = extract(TRAFFIC_LIGHT);
    let graph = &machine.digraph;

    let roots: Vec<_> = graph.nodes.values().filter(|n| n.parent_id.is_none()).collect();
    assert_eq!(roots.len(), 1);
    for node in graph.nodes.values() {
        if let Some(parent) = &node.parent_id {
            let parent = graph.node(parent).unwrap();
            assert_eq!(parent.children.get(&node.data.key), Some(&node.id));
        }
    }
}

#[test]
fn dotted_keys_do_not_collide_with_nested_paths() {
    let machine = extract(
        "createMachine({ states: { 'a.b': { on: { X: 'a' } }, a: { states: { b: { entry: 'inner' } } } } })",
    );
    let graph = &machine.digraph;
    assert!(machine.errors.is_empty(), "{:?}", machine.errors);
    assert_eq!(graph.nodes.len(), 4);

    let dotted = graph.node(r"(machine).a\.b").unwrap();
    assert_eq!(dotted.data.key, "a.b");
    assert_eq!(dotted.parent_id.as_deref(), Some("(machine)"));
    assert!(dotted.data.entry.is_empty());

    let nested = graph.node("(machine).a.b").unwrap();
    assert_eq!(nested.parent_id.as_deref(), Some("(machine).a"));
    assert_eq!(nested.data.entry[0].name, "inner");

    let root = graph.root_node().unwrap();
    assert_eq!(root.children.get("a.b"), Some(&dotted.id));
    let x = graph.edge(r"(machine).a\.b#X[0]").unwrap();
    assert_eq!(x.resolved_targets, vec!["(machine).a".to_string()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Actions
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn assign_literal_and_placeholder() {
    let machine = extract("createMachine({ entry: [assign({ count: 1 }), assign({ count: () => x })] })");
    let entry = &machine.digraph.root_node().unwrap().data.entry;

    assert_eq!(entry[0].data.as_ref().unwrap().to_json(), json!({ "count": 1 }));
    assert_eq!(
        entry[1].data.as_ref().unwrap().to_json(),
        json!({ "count": { "$$type": "expression", "code": "() => x" } })
    );
}

#[test]
fn inline_actions_are_registered() {
    let machine = extract("createMachine({ exit: [(ctx) => console.log(ctx), 'named'] })");
    let graph = &machine.digraph;
    let exit = &graph.root_node().unwrap().data.exit;

    assert!(exit[0].is_inline());
    assert_eq!(exit[0].name, "inline:(machine):exit[0]");
    assert_eq!(exit[1], Implementation::named("named"));
    assert!(graph.implementations.actions.contains_key("inline:(machine):exit[0]"));
    assert!(graph.implementations.actions.contains_key("named"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unresolved_target_is_data_not_failure() {
    let machine = extract("createMachine({ initial: 'a', states: { a: { on: { GO: 'nowhere.deep' } } } })");
    assert_eq!(machine.errors.len(), 1);
    assert_eq!(machine.errors[0].tag(), "transition_target_unresolved");

    let edge = machine.digraph.edge("(machine).a#GO[0]").unwrap();
    assert_eq!(edge.targets, vec!["nowhere.deep".to_string()]);
    assert!(edge.resolved_targets.is_empty());

    let location = machine.errors[0].location.clone().unwrap();
    assert_eq!(location.start_line, 1);
}

#[test]
fn several_machines_in_source_order() {
    let machines = extract_all(
        "const a = createMachine({ id: 'a' });\nconst b = Machine({ id: 'b' });\nconst t = createTestMachine({ id: 't' });",
    );
    let ids: Vec<_> = machines
        .iter()
        .map(|m| m.digraph.root_node().unwrap().data.id.clone().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "t"]);
    assert_eq!(machines[1].call_site.callee_name, "Machine");
    assert_eq!(machines[2].index(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Output shape
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn digraph_json_shape() {
    let machine = extract("createMachine({ initial: 'a', states: { a: { on: { GO: 'b' } }, b: {} } })");
    let value = machine.digraph.to_json().unwrap();

    assert_eq!(value["root"], json!("(machine)"));
    assert_eq!(value["nodes"]["(machine).a"]["parentId"], json!("(machine)"));
    assert_eq!(value["nodes"]["(machine).a"]["data"]["type"], json!("normal"));
    assert_eq!(value["edges"]["(machine).a#GO[0]"]["resolvedTargets"], json!(["(machine).b"]));
    assert_eq!(value["edges"]["(machine).a#GO[0]"]["data"]["eventType"], json!("GO"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════════

/// Quoted keys, including the characters node ids use as separators
fn state_key() -> impl Strategy<Value = String> {
    "[a-z.# \"\\\\]{1,4}"
}

fn quoted_key(key: &str) -> String {
    format!("'{}'", key.replace('\\', "\\\\"))
}

/// Nested `states` objects, possibly with repeated sibling keys, paired with
/// the number of states a first-key-wins walk keeps below the root
fn states_source() -> impl Strategy<Value = (String, usize)> {
    let leaf = Just(("{}".to_string(), 0usize));
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec((state_key(), inner), 0..4).prop_map(|children| {
            let mut seen: Vec<&str> = Vec::new();
            let mut kept = 0;
            for (key, (_, below)) in &children {
                if !seen.contains(&key.as_str()) {
                    seen.push(key);
                    kept += 1 + below;
                }
            }
            let members: Vec<String> = children
                .iter()
                .map(|(k, (v, _))| format!("{}: {}", quoted_key(k), v))
                .collect();
            (format!("{{ states: {{ {} }} }}", members.join(", ")), kept)
        })
    })
}

proptest! {
    /// Property: node ids are distinct and sibling keys never collide
    #[test]
    fn prop_node_ids_unique((config, descendants) in states_source()) {
        let machine = extract(&format!("createMachine({})", config));
        let graph = &machine.digraph;

        // Every kept state has its own entry in the id-keyed node table
        prop_assert_eq!(graph.nodes.len(), 1 + descendants);

        for node in graph.nodes.values() {
            if let Some(parent) = &node.parent_id {
                let parent = graph.node(parent).unwrap();
                prop_assert_eq!(parent.children.get(&node.data.key), Some(&node.id));
            }
            let mut keys: Vec<&str> = node.children.keys().collect();
            let count = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), count);
        }
    }
}
