//! Recoverable extraction errors
//!
//! These are data, not `Err`: the walk records them and carries on with
//! defaults, so callers always get a best-effort digraph.

use serde::Serialize;
use thiserror::Error;

use crate::shared::models::Span;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    #[error("transition target '{target}' of {edge_id} could not be resolved")]
    TransitionTargetUnresolved { edge_id: String, target: String },

    #[error("transition shape not supported")]
    TransitionPropertyUnhandled,

    #[error("unsupported {action} action")]
    ActionUnsupported { action: String },

    #[error("'states' must be an object literal")]
    StatesPropertyUnhandled,

    #[error("'initial' must be a string")]
    InitialPropertyUnhandled,

    #[error("unknown state type '{value}'")]
    StateTypeUnhandled { value: String },

    #[error("invoke shape not supported")]
    InvokePropertyUnhandled,

    #[error("'context' must be an object literal")]
    ContextPropertyUnhandled,

    #[error("machine configuration is missing or not an object literal")]
    MachineConfigMissing,
}

impl ExtractionErrorKind {
    /// Stable snake_case tag
    pub fn tag(&self) -> &'static str {
        match self {
            Self::TransitionTargetUnresolved { .. } => "transition_target_unresolved",
            Self::TransitionPropertyUnhandled => "transition_property_unhandled",
            Self::ActionUnsupported { .. } => "action_unsupported",
            Self::StatesPropertyUnhandled => "states_property_unhandled",
            Self::InitialPropertyUnhandled => "initial_property_unhandled",
            Self::StateTypeUnhandled { .. } => "state_type_unhandled",
            Self::InvokePropertyUnhandled => "invoke_property_unhandled",
            Self::ContextPropertyUnhandled => "context_property_unhandled",
            Self::MachineConfigMissing => "machine_config_missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionError {
    #[serde(flatten)]
    pub kind: ExtractionErrorKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Span>,
}

impl ExtractionError {
    pub fn new(kind: ExtractionErrorKind, location: Option<Span>) -> Self {
        Self { kind, location }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.tag(), self.kind)?;
        if let Some(span) = &self.location {
            write!(f, " at {}:{}", span.start_line, span.start_col)?;
        }
        Ok(())
    }
}
