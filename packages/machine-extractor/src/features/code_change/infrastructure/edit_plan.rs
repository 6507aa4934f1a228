//! Edit plan for one patch batch
//!
//! Patches are computed against one unmodified tree, so several of them can
//! target the same object or list. Direct replacements and deletions are
//! recorded as they come; insertions are collected per object and per list
//! and rendered once in `finish`, which keeps one edit per anchor. What still
//! overlaps after that is a conflict.

use tracing::debug;
use tree_sitter::Node;

use super::object_edits::{
    append_member, fill_empty, indent_continuation, inner_range, insert_before, priority_anchor,
    property_rank, MemberLayout,
};
use crate::config::ExtractorConfig;
use crate::features::code_change::domain::{normalize_edits, PatchError, PatchResult, TextEdit};
use crate::features::parsing::infrastructure::syntax::{line_indent, named_children, node_range, object_members};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::shared::models::TextRange;

/// Where a new property goes in its object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the last member
    Append,
    /// By insertion rank
    Ranked(u8),
}

impl Placement {
    pub fn for_key(key: &str) -> Self {
        property_rank(key).map(Placement::Ranked).unwrap_or(Placement::Append)
    }
}

/// Value of a property that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingValue {
    /// Verbatim value text
    Text(String),
    /// Action list: one item is written bare, more as an array
    List(Vec<String>),
    /// Object members (`key: value`), one per line in multi-line objects
    Members(Vec<String>),
}

impl PendingValue {
    fn render(&self, unit: &str, multiline: bool) -> String {
        match self {
            PendingValue::Text(text) => text.clone(),
            PendingValue::List(items) => render_list(items),
            PendingValue::Members(members) if !multiline => format!("{{ {} }}", members.join(", ")),
            PendingValue::Members(members) => {
                let lines: Vec<String> = members
                    .iter()
                    .map(|m| format!("{}{}", unit, indent_continuation(m, unit)))
                    .collect();
                format!("{{\n{}\n}}", lines.join(",\n"))
            }
        }
    }
}

fn render_list(items: &[String]) -> String {
    match items {
        [single] => single.clone(),
        items => format!("[{}]", items.join(", ")),
    }
}

#[derive(Debug)]
struct PendingProperty {
    key: String,
    placement: Placement,
    value: PendingValue,
}

impl PendingProperty {
    fn render(&self, unit: &str, multiline: bool) -> String {
        format!("{}: {}", self.key, self.value.render(unit, multiline))
    }
}

#[derive(Debug)]
struct PendingObject<'t> {
    object: Node<'t>,
    properties: Vec<PendingProperty>,
}

#[derive(Debug, Clone)]
enum ListItem {
    Existing(TextRange),
    New(String),
}

#[derive(Debug)]
enum ListShape {
    /// An array literal
    Array { inner: TextRange },
    /// A single value promoted to an array; `prefix` restores a shorthand key
    Single { prefix: String },
    /// A transition target string promoted to `{ target, actions }`
    Shorthand { indent: String },
}

#[derive(Debug)]
struct PendingList {
    range: TextRange,
    shape: ListShape,
    items: Vec<ListItem>,
}

impl PendingList {
    fn insert(&mut self, index: usize, text: String) {
        let index = index.min(self.items.len());
        self.items.insert(index, ListItem::New(text));
    }
}

pub struct EditPlan<'t> {
    source: &'t str,
    config: &'t ExtractorConfig,
    edits: Vec<TextEdit>,
    objects: Vec<PendingObject<'t>>,
    lists: Vec<PendingList>,
}

impl<'t> EditPlan<'t> {
    pub fn new(source: &'t str, config: &'t ExtractorConfig) -> Self {
        Self {
            source,
            config,
            edits: Vec::new(),
            objects: Vec::new(),
            lists: Vec::new(),
        }
    }

    pub fn source(&self) -> &'t str {
        self.source
    }

    pub fn config(&self) -> &'t ExtractorConfig {
        self.config
    }

    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.push(TextEdit::replace(range, text));
    }

    pub fn delete(&mut self, range: TextRange) {
        self.edits.push(TextEdit::delete(range));
    }

    /// Pending value of a new property `key` in `object`, created on first use
    pub fn property(
        &mut self,
        object: Node<'t>,
        key: &str,
        placement: Placement,
        init: impl FnOnce() -> PendingValue,
    ) -> &mut PendingValue {
        let position = match self.objects.iter().position(|o| o.object.id() == object.id()) {
            Some(position) => position,
            None => {
                self.objects.push(PendingObject {
                    object,
                    properties: Vec::new(),
                });
                self.objects.len() - 1
            }
        };
        let pending = &mut self.objects[position];
        let index = match pending.properties.iter().position(|p| p.key == key) {
            Some(index) => index,
            None => {
                pending.properties.push(PendingProperty {
                    key: key.to_string(),
                    placement,
                    value: init(),
                });
                pending.properties.len() - 1
            }
        };
        &mut pending.properties[index].value
    }

    /// Insert `text` at `index` of a new list property `key`
    pub fn insert_into_new_list(&mut self, object: Node<'t>, key: &str, index: usize, text: String) {
        if let PendingValue::List(items) = self.property(object, key, Placement::for_key(key), || PendingValue::List(Vec::new())) {
            let index = index.min(items.len());
            items.insert(index, text);
        }
    }

    /// Insert `text` at `index` of an existing list value
    ///
    /// Arrays get the item spliced in; any other value becomes the first item
    /// of a new array. `member` is the property owning the value, which for a
    /// shorthand `{ entry }` is the value itself.
    pub fn insert_into_list(&mut self, member: Node<'t>, value: Node<'t>, index: usize, text: String) {
        let range = node_range(&value);
        let position = match self.lists.iter().position(|l| l.range == range) {
            Some(position) => position,
            None => {
                let list = if value.kind() == node_kinds::ARRAY {
                    PendingList {
                        range,
                        shape: ListShape::Array {
                            inner: inner_range(&value).unwrap_or(TextRange::empty(range.start + 1)),
                        },
                        items: named_children(&value)
                            .iter()
                            .map(|item| ListItem::Existing(node_range(item)))
                            .collect(),
                    }
                } else {
                    let prefix = if member.id() == value.id() {
                        format!("{}: ", self.text(range))
                    } else {
                        String::new()
                    };
                    PendingList {
                        range,
                        shape: ListShape::Single { prefix },
                        items: vec![ListItem::Existing(range)],
                    }
                };
                self.lists.push(list);
                self.lists.len() - 1
            }
        };
        self.lists[position].insert(index, text);
    }

    /// Insert action `text` into a target-only transition, turning it into
    /// `{ target, actions }`
    pub fn insert_into_shorthand(&mut self, transition: Node<'t>, index: usize, text: String) {
        let range = node_range(&transition);
        let position = match self.lists.iter().position(|l| l.range == range) {
            Some(position) => position,
            None => {
                self.lists.push(PendingList {
                    range,
                    shape: ListShape::Shorthand {
                        indent: line_indent(self.source, range.start).to_string(),
                    },
                    items: Vec::new(),
                });
                self.lists.len() - 1
            }
        };
        self.lists[position].insert(index, text);
    }

    fn text(&self, range: TextRange) -> &'t str {
        self.source.get(range.start..range.end).unwrap_or("")
    }

    /// Render pending insertions and return the sorted, disjoint batch
    pub fn finish(mut self) -> PatchResult<Vec<TextEdit>> {
        let unit = self.config.indent_unit();

        for list in std::mem::take(&mut self.lists) {
            let edits = self.render_list(&list, &unit);
            self.edits.extend(edits);
        }
        for pending in std::mem::take(&mut self.objects) {
            let edits = self.render_object(pending, &unit)?;
            self.edits.extend(edits);
        }

        debug!(edits = self.edits.len(), "edit plan rendered");
        normalize_edits(self.edits, self.source.len())
    }

    fn render_list(&self, list: &PendingList, unit: &str) -> Vec<TextEdit> {
        let item_text = |item: &ListItem| match item {
            ListItem::Existing(range) => self.text(*range).to_string(),
            ListItem::New(text) => text.clone(),
        };

        match &list.shape {
            ListShape::Single { prefix } => {
                let items: Vec<String> = list.items.iter().map(item_text).collect();
                vec![TextEdit::replace(list.range, format!("{}[{}]", prefix, items.join(", ")))]
            }
            ListShape::Shorthand { indent } => {
                let actions: Vec<String> = list.items.iter().map(item_text).collect();
                let inner = format!("{}{}", indent, unit);
                let text = format!(
                    "{{\n{inner}target: {},\n{inner}actions: {}\n{}}}",
                    self.text(list.range),
                    render_list(&actions),
                    indent,
                    inner = inner
                );
                vec![TextEdit::replace(list.range, text)]
            }
            ListShape::Array { inner } => {
                if !list.items.iter().any(|i| matches!(i, ListItem::Existing(_))) {
                    let items: Vec<String> = list.items.iter().map(item_text).collect();
                    return vec![TextEdit::replace(*inner, items.join(", "))];
                }

                // Runs of new items, anchored before the first existing item
                // or after the existing item preceding them
                let mut edits = Vec::new();
                let mut run: Vec<String> = Vec::new();
                let mut previous: Option<TextRange> = None;
                for item in &list.items {
                    match item {
                        ListItem::New(text) => run.push(text.clone()),
                        ListItem::Existing(range) => {
                            if !run.is_empty() {
                                let edit = match previous {
                                    Some(prev) => TextEdit::insert(prev.end, format!(", {}", run.join(", "))),
                                    None => TextEdit::insert(range.start, format!("{}, ", run.join(", "))),
                                };
                                edits.push(edit);
                                run.clear();
                            }
                            previous = Some(*range);
                        }
                    }
                }
                if let (false, Some(prev)) = (run.is_empty(), previous) {
                    edits.push(TextEdit::insert(prev.end, format!(", {}", run.join(", "))));
                }
                edits
            }
        }
    }

    fn render_object(&self, mut pending: PendingObject<'t>, unit: &str) -> PatchResult<Vec<TextEdit>> {
        let object = pending.object;
        // Higher ranks first, appended properties last, otherwise batch order
        pending.properties.sort_by_key(|p| match p.placement {
            Placement::Ranked(rank) => std::cmp::Reverse(rank),
            Placement::Append => std::cmp::Reverse(0),
        });

        if object_members(&object).is_empty() {
            let properties: Vec<String> = pending.properties.iter().map(|p| p.render(unit, true)).collect();
            return fill_empty(&object, &properties, self.source, self.config)
                .map(|edit| vec![edit])
                .ok_or_else(|| PatchError::MissingLocation("object literal".to_string()));
        }

        let layout = MemberLayout::of(&object, self.source, self.config);
        let mut edits = Vec::new();
        for property in &pending.properties {
            let text = property.render(unit, layout.multiline);
            let edit = match property.placement {
                Placement::Ranked(rank) => {
                    priority_anchor(&object, rank, self.source).map(|anchor| insert_before(&anchor, &text, &layout))
                }
                Placement::Append => append_member(&object, &text, &layout),
            };
            edits.push(edit.ok_or_else(|| PatchError::MissingLocation("object literal".to_string()))?);
        }
        Ok(edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::code_change::domain::apply_text_edits;
    use crate::features::parsing::infrastructure::syntax::find_property;
    use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::fields;
    use crate::features::parsing::{Parser, SourceFile, TreeSitterParser};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> SourceFile {
        TreeSitterParser::typescript().parse(source, "test.ts").unwrap()
    }

    /// Outermost object literal of the file
    fn root_object(file: &SourceFile) -> Node<'_> {
        fn find<'t>(node: Node<'t>) -> Option<Node<'t>> {
            if node.kind() == node_kinds::OBJECT {
                return Some(node);
            }
            named_children(&node).into_iter().find_map(find)
        }
        find(file.root()).unwrap()
    }

    fn run(source: &str, build: impl for<'t> Fn(&mut EditPlan<'t>, Node<'t>)) -> String {
        let file = parse(source);
        let config = ExtractorConfig::default();
        let mut plan = EditPlan::new(&file.text, &config);
        build(&mut plan, root_object(&file));
        let edits = plan.finish().unwrap();
        apply_text_edits(&file.text, &edits).unwrap()
    }

    fn value_of<'t>(object: Node<'t>, source: &str, key: &str) -> (Node<'t>, Node<'t>) {
        let pair = find_property(&object, key, source).unwrap();
        (pair, pair.child_by_field_name(fields::VALUE).unwrap_or(pair))
    }

    #[test]
    fn test_properties_into_empty_object_are_ranked() {
        let out = run("x = {}", |plan, object| {
            plan.property(object, "entry", Placement::Append, || PendingValue::Text("\"a\"".into()));
            plan.property(object, "type", Placement::for_key("type"), || PendingValue::Text("\"final\"".into()));
            plan.property(object, "initial", Placement::for_key("initial"), || PendingValue::Text("\"b\"".into()));
        });
        assert_eq!(out, "x = {\n  initial: \"b\",\n  type: \"final\",\n  entry: \"a\"\n}");
    }

    #[test]
    fn test_new_list_property_grows_within_batch() {
        let out = run("x = { id: 'm' }", |plan, object| {
            plan.insert_into_new_list(object, "entry", 0, "\"a\"".into());
            plan.insert_into_new_list(object, "entry", 0, "\"b\"".into());
        });
        assert_eq!(out, "x = { id: 'm', entry: [\"b\", \"a\"] }");
    }

    #[test]
    fn test_members_value_renders_multiline() {
        let out = run("x = {\n  on: {}\n}", |plan, object| {
            if let PendingValue::Members(members) =
                plan.property(object, "states", Placement::for_key("states"), || PendingValue::Members(Vec::new()))
            {
                members.push("a: {}".to_string());
                members.push("b: {}".to_string());
            }
        });
        assert_eq!(out, "x = {\n  states: {\n    a: {},\n    b: {}\n  },\n  on: {}\n}");
    }

    #[test]
    fn test_insert_into_existing_lists() {
        let source = "x = { entry: ['a', 'b'], exit: 'c', empty: [] }";
        let out = run(source, |plan, object| {
            let text = plan.source();
            let (pair, entry) = value_of(object, text, "entry");
            plan.insert_into_list(pair, entry, 1, "\"n1\"".into());
            plan.insert_into_list(pair, entry, 0, "\"n0\"".into());
            plan.insert_into_list(pair, entry, 9, "\"n9\"".into());
            let (pair, exit) = value_of(object, text, "exit");
            plan.insert_into_list(pair, exit, 0, "\"x\"".into());
            let (pair, empty) = value_of(object, text, "empty");
            plan.insert_into_list(pair, empty, 0, "\"e\"".into());
        });
        assert_eq!(
            out,
            "x = { entry: [\"n0\", 'a', \"n1\", 'b', \"n9\"], exit: [\"x\", 'c'], empty: [\"e\"] }"
        );
    }

    #[test]
    fn test_shorthand_member_keeps_its_key() {
        let out = run("x = { entry }", |plan, object| {
            let member = object_members(&object)[0];
            plan.insert_into_list(member, member, 1, "\"more\"".into());
        });
        assert_eq!(out, "x = { entry: [entry, \"more\"] }");
    }

    #[test]
    fn test_shorthand_transition_is_promoted() {
        let out = run("x = {\n  on: {\n    GO: 'b'\n  }\n}", |plan, object| {
            let text = plan.source();
            let (_, on) = value_of(object, text, "on");
            let (_, go) = value_of(on, text, "GO");
            plan.insert_into_shorthand(go, 0, "\"act\"".into());
        });
        assert_eq!(
            out,
            "x = {\n  on: {\n    GO: {\n      target: 'b',\n      actions: \"act\"\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_overlapping_edits_fail() {
        let file = parse("x = { a: 1 }");
        let config = ExtractorConfig::default();
        let mut plan = EditPlan::new(&file.text, &config);
        let object = root_object(&file);
        plan.delete(inner_range(&object).unwrap());
        plan.property(object, "b", Placement::Append, || PendingValue::Text("2".into()));
        assert!(matches!(plan.finish(), Err(PatchError::ConflictingEdits { .. })));
    }
}
