//! Implementations and extracted literal data
//!
//! An `Implementation` names an action, actor or guard. Its data is either
//! captured as JSON-like literals (`JsonItem`) or kept as verbatim source
//! text (`ExpressionPlaceholder`) when it cannot be captured faithfully.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

use crate::shared::models::OrderedMap;

/// Verbatim source text standing in for a value that is not plain data
///
/// Consumers must treat this as raw, non-editable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionPlaceholder {
    pub code: String,
}

impl ExpressionPlaceholder {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Tag used when a placeholder is serialized
pub const EXPRESSION_TAG: &str = "$$type";
pub const EXPRESSION_TAG_VALUE: &str = "expression";

/// JSON-compatible value that may embed expression placeholders
#[derive(Debug, Clone, PartialEq)]
pub enum JsonItem {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonItem>),
    Object(OrderedMap<JsonItem>),
    Expression(ExpressionPlaceholder),
}

impl JsonItem {
    pub fn expression(code: impl Into<String>) -> Self {
        JsonItem::Expression(ExpressionPlaceholder::new(code))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, JsonItem::Expression(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonItem::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&OrderedMap<JsonItem>> {
        match self {
            JsonItem::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`
    ///
    /// Placeholders become `{ "$$type": "expression", "code": ... }`.
    pub fn to_json(&self) -> Value {
        match self {
            JsonItem::Null => Value::Null,
            JsonItem::Bool(b) => Value::Bool(*b),
            JsonItem::Number(n) => number_value(*n),
            JsonItem::String(s) => Value::String(s.clone()),
            JsonItem::Array(items) => Value::Array(items.iter().map(JsonItem::to_json).collect()),
            JsonItem::Object(map) => {
                let mut out = Map::new();
                for (k, v) in map.iter() {
                    out.insert(k.to_string(), v.to_json());
                }
                Value::Object(out)
            }
            JsonItem::Expression(expr) => {
                let mut out = Map::new();
                out.insert(
                    EXPRESSION_TAG.to_string(),
                    Value::String(EXPRESSION_TAG_VALUE.to_string()),
                );
                out.insert("code".to_string(), Value::String(expr.code.clone()));
                Value::Object(out)
            }
        }
    }

    /// Inverse of `to_json`
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => JsonItem::Null,
            Value::Bool(b) => JsonItem::Bool(*b),
            Value::Number(n) => JsonItem::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => JsonItem::String(s.clone()),
            Value::Array(items) => JsonItem::Array(items.iter().map(JsonItem::from_json).collect()),
            Value::Object(map) => {
                if map.get(EXPRESSION_TAG).and_then(Value::as_str) == Some(EXPRESSION_TAG_VALUE) {
                    if let Some(code) = map.get("code").and_then(Value::as_str) {
                        return JsonItem::expression(code);
                    }
                }
                JsonItem::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), JsonItem::from_json(v)))
                        .collect(),
                )
            }
        }
    }
}

/// Integral values serialize without a fractional part
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl Serialize for JsonItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonItem::Null => serializer.serialize_unit(),
            JsonItem::Bool(b) => serializer.serialize_bool(*b),
            JsonItem::Number(n) => number_value(*n).serialize(serializer),
            JsonItem::String(s) => serializer.serialize_str(s),
            JsonItem::Array(items) => items.serialize(serializer),
            JsonItem::Object(map) => map.serialize(serializer),
            JsonItem::Expression(expr) => expr.serialize(serializer),
        }
    }
}

impl Serialize for ExpressionPlaceholder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(EXPRESSION_TAG, EXPRESSION_TAG_VALUE)?;
        map.serialize_entry("code", &self.code)?;
        map.end()
    }
}

/// Named reference to an action, actor or guard
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Implementation {
    pub name: String,

    /// Captured parameters, or a placeholder for inline code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonItem>,
}

impl Implementation {
    /// Reference by name only (`'doStuff'`)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
        }
    }

    pub fn with_data(name: impl Into<String>, data: JsonItem) -> Self {
        Self {
            name: name.into(),
            data: Some(data),
        }
    }

    /// Inline code that could not be captured as data
    pub fn inline(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self::with_data(name, JsonItem::expression(code))
    }

    pub fn is_inline(&self) -> bool {
        self.name.starts_with(INLINE_PREFIX)
    }
}

/// Prefix of generated names for inline implementations
pub const INLINE_PREFIX: &str = "inline:";

/// `inline:<owner>:<slot>[<index>]`
pub fn inline_name(owner_id: &str, slot: &str, index: usize) -> String {
    format!("{}{}:{}[{}]", INLINE_PREFIX, owner_id, slot, index)
}
