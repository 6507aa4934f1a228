//! Machine call site summary

use serde::Serialize;

use crate::shared::models::{Span, TextRange};

/// Where a machine factory is called, without extracting it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineCallSite {
    /// Position among the machine calls of the file
    pub index: usize,

    /// `createMachine` for both `createMachine(...)` and `x.createMachine(...)`
    pub callee_name: String,

    pub is_member_call: bool,
    pub range: TextRange,
    pub span: Span,
}
