//! Machine call matcher
//!
//! Finds calls of the configured factory names, as a bare callee
//! (`createMachine(...)`) or as a member property (`xstate.createMachine(...)`).
//! Type-only subtrees are skipped.

use tree_sitter::Node;

use crate::config::ExtractorConfig;
use crate::features::machine_extraction::domain::MachineCallSite;
use crate::features::parsing::infrastructure::syntax::{first_expression, node_range};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    fields, is_type_only, node_kinds,
};
use crate::features::parsing::SourceFile;

#[derive(Debug, Clone, Copy)]
pub struct MachineCall<'t> {
    pub index: usize,
    pub node: Node<'t>,
    pub callee_name: &'t str,
    pub is_member_call: bool,
}

impl<'t> MachineCall<'t> {
    /// First argument: the root state config
    pub fn config(&self) -> Option<Node<'t>> {
        let args = self.node.child_by_field_name(fields::ARGUMENTS)?;
        first_expression(&args)
    }

    pub fn site(&self) -> MachineCallSite {
        MachineCallSite {
            index: self.index,
            callee_name: self.callee_name.to_string(),
            is_member_call: self.is_member_call,
            range: node_range(&self.node),
            span: SourceFile::span_of(&self.node),
        }
    }
}

/// All machine calls of a file, in source order
pub fn find_machine_calls<'t>(file: &'t SourceFile, config: &ExtractorConfig) -> Vec<MachineCall<'t>> {
    let mut calls = Vec::new();
    visit(file.root(), file, config, &mut calls);
    calls
}

fn visit<'t>(node: Node<'t>, file: &'t SourceFile, config: &ExtractorConfig, calls: &mut Vec<MachineCall<'t>>) {
    if is_type_only(node.kind()) {
        return;
    }
    if node.kind() == node_kinds::CALL_EXPRESSION {
        if let Some((callee_name, is_member_call)) = factory_callee(node, file, config) {
            calls.push(MachineCall {
                index: calls.len(),
                node,
                callee_name,
                is_member_call,
            });
        }
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    for child in children {
        visit(child, file, config, calls);
    }
}

fn factory_callee<'t>(
    call: Node<'t>,
    file: &'t SourceFile,
    config: &ExtractorConfig,
) -> Option<(&'t str, bool)> {
    let callee = call.child_by_field_name(fields::FUNCTION)?;
    let (name_node, is_member_call) = match callee.kind() {
        node_kinds::IDENTIFIER => (callee, false),
        node_kinds::MEMBER_EXPRESSION => (callee.child_by_field_name(fields::PROPERTY)?, true),
        _ => return None,
    };
    let name = file.text_of(&name_node);
    config.is_factory_name(name).then_some((name, is_member_call))
}

/// The `index`-th machine call, if the file still has it
pub fn machine_call_at<'t>(
    file: &'t SourceFile,
    config: &ExtractorConfig,
    index: usize,
) -> Option<MachineCall<'t>> {
    find_machine_calls(file, config).into_iter().nth(index)
}
