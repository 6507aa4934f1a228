//! Code change infrastructure: text synthesis over object literals

pub mod edit_plan;
pub mod object_edits;

pub use edit_plan::{EditPlan, PendingValue, Placement};
pub use object_edits::{render_js_value, render_key};
