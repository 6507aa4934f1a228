//! Patch a machine
//!
//! Typed patches are checked against the last extracted digraph, their
//! syntax is re-located through the recorded AST paths, and the edit plan
//! turns them into one disjoint batch of text edits against the unmodified
//! source.

use tracing::{debug, info};
use tree_sitter::Node;

use crate::config::ExtractorConfig;
use crate::features::code_change::domain::{
    ActionSlot, DataPatch, EdgePatch, MachinePatch, NodePatch, PatchError, PatchResult, RawPatch, TextEdit,
};
use crate::features::code_change::infrastructure::object_edits::removal_range;
use crate::features::code_change::infrastructure::{
    render_js_value, render_key, EditPlan, PendingValue, Placement,
};
use crate::features::machine_extraction::application::{extract_machine, MachineExtraction};
use crate::features::machine_extraction::domain::{
    AstPath, HistoryKind, JsonItem, Node as StateNode, StateType, ROOT_NODE_ID,
};
use crate::features::machine_extraction::infrastructure::literals::match_object;
use crate::features::machine_extraction::infrastructure::{machine_call_at, MachineCall};
use crate::features::parsing::infrastructure::syntax::{node_range, object_properties};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{fields, node_kinds};
use crate::features::parsing::SourceFile;

/// Edits for `patches` against the machine `extraction` was taken from
pub fn compute_edits(
    file: &SourceFile,
    call: &MachineCall<'_>,
    extraction: &MachineExtraction,
    patches: &[MachinePatch],
    config: &ExtractorConfig,
) -> PatchResult<Vec<TextEdit>> {
    let mut session = PatchSession {
        file,
        call: call.node,
        extraction,
        plan: EditPlan::new(&file.text, config),
    };
    for patch in patches {
        session.apply(patch)?;
    }
    let edits = session.plan.finish()?;
    debug!(
        file = %file.file_name,
        index = extraction.index(),
        patches = patches.len(),
        edits = edits.len(),
        "patch batch computed"
    );
    Ok(edits)
}

/// Validate raw patches, re-extract machine `index` and compute the edits
pub fn patch_machine(
    file: &SourceFile,
    index: usize,
    patches: &[RawPatch],
    config: &ExtractorConfig,
) -> PatchResult<Vec<TextEdit>> {
    let patches = MachinePatch::parse_all(patches)?;
    let call = machine_call_at(file, config, index).ok_or_else(|| PatchError::MachineNotFound {
        file: file.file_name.clone(),
        index,
    })?;
    let extraction = extract_machine(file, &call, config);
    if extraction.has_errors() {
        info!(
            file = %file.file_name,
            index,
            errors = extraction.errors.len(),
            "patching a machine with extraction errors"
        );
    }
    compute_edits(file, &call, &extraction, &patches, config)
}

struct PatchSession<'a> {
    file: &'a SourceFile,
    call: Node<'a>,
    extraction: &'a MachineExtraction,
    plan: EditPlan<'a>,
}

impl<'a> PatchSession<'a> {
    fn apply(&mut self, patch: &MachinePatch) -> PatchResult<()> {
        match patch {
            MachinePatch::Node(patch) => self.apply_node(patch),
            MachinePatch::Edge(patch) => self.apply_edge(patch),
            MachinePatch::Data(patch) => self.apply_data(patch),
        }
    }

    fn apply_node(&mut self, patch: &NodePatch) -> PatchResult<()> {
        match patch {
            NodePatch::Add { parent_id, key, .. } => self.add_node(parent_id, key),
            NodePatch::Remove { node_id } => self.remove_node(node_id),
            NodePatch::ReplaceKey { node_id, key } => self.rename_node(node_id, key),
            NodePatch::ReplaceInitial { node_id, initial } => {
                if self.node(node_id)?.data.initial == *initial {
                    return Ok(());
                }
                let object = self.node_object(node_id)?;
                let text = initial.as_deref().map(|i| self.quote(i));
                self.set_scalar(object, "initial", text)
            }
            NodePatch::ReplaceType { node_id, state_type } => {
                if self.node(node_id)?.data.state_type == *state_type {
                    return Ok(());
                }
                let object = self.node_object(node_id)?;
                let text = (*state_type != StateType::Normal).then(|| self.quote(state_type.as_str()));
                self.set_scalar(object, "type", text)
            }
            NodePatch::ReplaceHistory { node_id, history } => {
                let effective = |h: Option<HistoryKind>| h.unwrap_or(HistoryKind::Shallow);
                if effective(self.node(node_id)?.data.history) == effective(*history) {
                    return Ok(());
                }
                let object = self.node_object(node_id)?;
                let text = (effective(*history) == HistoryKind::Deep).then(|| self.quote(HistoryKind::Deep.as_str()));
                self.set_scalar(object, "history", text)
            }
            NodePatch::AddAction {
                node_id,
                slot,
                index,
                action,
            } => self.add_node_action(node_id, *slot, *index, action),
        }
    }

    fn apply_edge(&mut self, patch: &EdgePatch) -> PatchResult<()> {
        let EdgePatch::AddAction { edge_id, index, action } = patch;
        if self.extraction.digraph.edge(edge_id).is_none() {
            return Err(PatchError::UnknownEdge(edge_id.clone()));
        }
        let transition = self
            .extraction
            .locations
            .edge(edge_id)
            .and_then(|location| self.resolve(&location.transition))
            .ok_or_else(|| PatchError::MissingLocation(format!("transition '{}'", edge_id)))?;
        let text = self.quote(action);

        if transition.kind() != node_kinds::OBJECT {
            self.plan.insert_into_shorthand(transition, *index, text);
            return Ok(());
        }
        match self.property(transition, &["actions"]) {
            Some((member, value)) => self.plan.insert_into_list(member, value, *index, text),
            None => self.plan.insert_into_new_list(transition, "actions", *index, text),
        }
        Ok(())
    }

    fn apply_data(&mut self, patch: &DataPatch) -> PatchResult<()> {
        let DataPatch::SetContext { key, value } = patch;
        let root = self.node_object(ROOT_NODE_ID)?;
        let key_text = render_key(key, self.plan.config());
        let text = render_js_value(value, self.plan.config());

        let context = self
            .extraction
            .locations
            .context
            .as_ref()
            .and_then(|path| self.resolve(path));
        let Some(context) = context else {
            if self.property(root, &["context"]).is_some() {
                return Err(PatchError::MissingLocation("context object".to_string()));
            }
            let member = format!("{}: {}", key_text, text);
            if let PendingValue::Members(members) =
                self.plan.property(root, "context", Placement::Append, || PendingValue::Members(Vec::new()))
            {
                members.push(member);
            }
            return Ok(());
        };

        match self.property(context, &[key.as_str()]) {
            Some((member, current)) => {
                let unchanged = self.extraction.digraph.data.context.get(key) == Some(&JsonItem::from_json(value))
                    || self.file.text_of(&current) == text;
                if !unchanged {
                    self.replace_value(member, current, &key_text, text);
                }
            }
            None => *self.plan.property(context, &key_text, Placement::Append, || PendingValue::Text(String::new())) = PendingValue::Text(text),
        }
        Ok(())
    }

    fn add_node(&mut self, parent_id: &str, key: &str) -> PatchResult<()> {
        let parent = self.node(parent_id)?;
        if parent.children.contains_key(key) {
            return Err(PatchError::invalid(
                "add",
                format!("/nodes/{}", parent_id),
                format!("state '{}' already exists", key),
            ));
        }
        let object = self.node_object(parent_id)?;
        let key_text = render_key(key, self.plan.config());

        match self.property(object, &["states"]) {
            Some((_, value)) => {
                let states = match_object(value, self.file)
                    .ok_or_else(|| PatchError::MissingLocation(format!("states of '{}'", parent_id)))?;
                *self.plan.property(states, &key_text, Placement::Append, || PendingValue::Text(String::new())) =
                    PendingValue::Text("{}".to_string());
            }
            None => {
                if let PendingValue::Members(members) = self.plan.property(
                    object,
                    "states",
                    Placement::for_key("states"),
                    || PendingValue::Members(Vec::new()),
                ) {
                    members.push(format!("{}: {{}}", key_text));
                }
            }
        }
        Ok(())
    }

    fn remove_node(&mut self, node_id: &str) -> PatchResult<()> {
        if self.node(node_id)?.parent_id.is_none() {
            return Err(PatchError::unsupported("remove", format!("/nodes/{}", node_id)));
        }
        let member = self.node_property(node_id)?;
        let states = member
            .parent()
            .filter(|p| p.kind() == node_kinds::OBJECT)
            .ok_or_else(|| PatchError::MissingLocation(format!("states containing '{}'", node_id)))?;
        self.remove_member(states, member)
    }

    fn rename_node(&mut self, node_id: &str, key: &str) -> PatchResult<()> {
        let node = self.node(node_id)?;
        let Some(parent_id) = node.parent_id.as_deref() else {
            return Err(PatchError::unsupported("replace", format!("/nodes/{}/data/key", node_id)));
        };
        if node.data.key == key {
            return Ok(());
        }
        if self.node(parent_id)?.children.contains_key(key) {
            return Err(PatchError::invalid(
                "replace",
                format!("/nodes/{}/data/key", node_id),
                format!("state '{}' already exists", key),
            ));
        }

        let member = self.node_property(node_id)?;
        match member.child_by_field_name(fields::KEY) {
            Some(key_node) => {
                let text = if key_node.kind() == node_kinds::STRING {
                    self.quote(key)
                } else {
                    render_key(key, self.plan.config())
                };
                self.plan.replace(node_range(&key_node), text);
            }
            // Shorthand `{ a }`: the identifier stays as the value
            None => {
                let text = format!("{}: {}", render_key(key, self.plan.config()), self.file.text_of(&member));
                self.plan.replace(node_range(&member), text);
            }
        }
        Ok(())
    }

    fn add_node_action(&mut self, node_id: &str, slot: ActionSlot, index: usize, action: &str) -> PatchResult<()> {
        let object = self.node_object(node_id)?;
        let text = self.quote(action);
        match self.property(object, &[slot.as_str(), slot.legacy_name()]) {
            Some((member, value)) => self.plan.insert_into_list(member, value, index, text),
            None => self.plan.insert_into_new_list(object, slot.as_str(), index, text),
        }
        Ok(())
    }

    /// Default-aware scalar property update
    ///
    /// `None` is the implicit default: the property is removed if present.
    /// Otherwise the existing value is replaced, or the property is inserted
    /// at its ranked position.
    fn set_scalar(&mut self, object: Node<'a>, key: &str, text: Option<String>) -> PatchResult<()> {
        match (text, self.property(object, &[key])) {
            (None, None) => Ok(()),
            (None, Some((member, _))) => self.remove_member(object, member),
            (Some(text), Some((member, value))) => {
                if self.file.text_of(&value) != text {
                    self.replace_value(member, value, key, text);
                }
                Ok(())
            }
            (Some(text), None) => {
                *self.plan.property(object, key, Placement::for_key(key), || PendingValue::Text(String::new())) =
                    PendingValue::Text(text);
                Ok(())
            }
        }
    }

    fn replace_value(&mut self, member: Node<'a>, value: Node<'a>, key_text: &str, text: String) {
        if member.id() == value.id() {
            self.plan.replace(node_range(&member), format!("{}: {}", key_text, text));
        } else {
            self.plan.replace(node_range(&value), text);
        }
    }

    fn remove_member(&mut self, object: Node<'a>, member: Node<'a>) -> PatchResult<()> {
        let range = removal_range(&object, &member)
            .ok_or_else(|| PatchError::MissingLocation("object member".to_string()))?;
        self.plan.delete(range);
        Ok(())
    }

    fn node(&self, id: &str) -> PatchResult<&'a StateNode> {
        self.extraction
            .digraph
            .node(id)
            .ok_or_else(|| PatchError::UnknownNode(id.to_string()))
    }

    /// The state's config object literal
    fn node_object(&self, id: &str) -> PatchResult<Node<'a>> {
        self.node(id)?;
        self.extraction
            .locations
            .node(id)
            .and_then(|location| location.config.as_ref())
            .and_then(|path| self.resolve(path))
            .filter(|node| node.kind() == node_kinds::OBJECT)
            .ok_or_else(|| PatchError::MissingLocation(format!("state '{}'", id)))
    }

    /// The state's member in its parent `states` object
    fn node_property(&self, id: &str) -> PatchResult<Node<'a>> {
        self.node(id)?;
        self.extraction
            .locations
            .node(id)
            .and_then(|location| location.property.as_ref())
            .and_then(|path| self.resolve(path))
            .ok_or_else(|| PatchError::MissingLocation(format!("state '{}'", id)))
    }

    fn resolve(&self, path: &AstPath) -> Option<Node<'a>> {
        path.resolve(self.call, self.file.root())
    }

    /// (member, value) of the first property named one of `names`
    fn property(&self, object: Node<'a>, names: &[&str]) -> Option<(Node<'a>, Node<'a>)> {
        object_properties(&object, &self.file.text)
            .into_iter()
            .find(|(key, _, _)| names.contains(&key.as_str()))
            .map(|(_, member, value)| (member, value))
    }

    fn quote(&self, value: &str) -> String {
        self.plan.config().quote_string(value)
    }
}
