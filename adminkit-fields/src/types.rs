//! Core value-level types for the fields model.
//!
//! Field kinds, validation rules, optional value transforms and default values,
//! plus the serde definitions that describe entities and their reference
//! fields in YAML.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::view::ViewConfig;

/// A raw record fetched for an entity, keyed by property name.
pub type Record = serde_json::Map<String, Value>;

/// Identifier → label mapping used by reference selection controls.
pub type Choices = IndexMap<String, Value>;

/// The kind of a field — determines how its value is edited and displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    String,
    Text,
    Number,
    Boolean,
    Date,
    Choice,
    Reference,
}

impl FieldKind {
    /// The tag used in configuration files and by the rendering layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Choice => "choice",
            FieldKind::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rules attached to a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Validation {
    #[serde(default)]
    pub required: bool,
}

impl Validation {
    pub fn required() -> Self {
        Self { required: true }
    }
}

/// Function applied to a value by a [`Transform`].
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// An optional value-to-value function.
///
/// `Disabled` behaves as the identity.
#[derive(Clone, Default)]
pub enum Transform {
    #[default]
    Disabled,
    Apply(TransformFn),
}

impl Transform {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Transform::Apply(Arc::new(f))
    }

    /// Cut strings longer than `max_chars` characters and append `"..."`.
    /// Non-string values pass through unchanged.
    pub fn truncate(max_chars: usize) -> Self {
        Transform::new(move |value| match value {
            Value::String(s) if s.chars().count() > max_chars => {
                let mut cut: String = s.chars().take(max_chars).collect();
                cut.push_str("...");
                Value::String(cut)
            }
            other => other,
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Transform::Apply(_))
    }

    pub fn apply(&self, value: Value) -> Value {
        match self {
            Transform::Disabled => value,
            Transform::Apply(f) => f(value),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Disabled => f.write_str("Transform::Disabled"),
            Transform::Apply(_) => f.write_str("Transform::Apply(..)"),
        }
    }
}

/// Function producing a default value on demand.
pub type ProducerFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// The default value of a field: nothing, a constant, or a producer.
#[derive(Clone, Default)]
pub enum DefaultValue {
    #[default]
    None,
    Value(Value),
    Producer(ProducerFn),
}

impl DefaultValue {
    pub fn producer(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Producer(Arc::new(f))
    }

    /// Resolve the default. Blank results count as no default.
    pub fn resolve(&self) -> Option<Value> {
        let value = match self {
            DefaultValue::None => return None,
            DefaultValue::Value(v) => v.clone(),
            DefaultValue::Producer(f) => f(),
        };
        (!is_blank(&value)).then_some(value)
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Value(value)
    }
}

impl From<Option<Value>> for DefaultValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(DefaultValue::None, DefaultValue::Value)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => f.write_str("DefaultValue::None"),
            DefaultValue::Value(v) => f.debug_tuple("DefaultValue::Value").field(v).finish(),
            DefaultValue::Producer(_) => f.write_str("DefaultValue::Producer(..)"),
        }
    }
}

/// Whether a value counts as "not filled in".
///
/// `null`, the empty string and the empty array are blank; `0` and `false`
/// are real values.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// A plain field declared on an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub list: bool,
    #[serde(default)]
    pub validation: Validation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// A reference field declared on an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub target_entity: String,
    pub target_field: String,
    /// Maximum characters shown in list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate_list: Option<usize>,
    #[serde(default = "default_true")]
    pub list: bool,
    #[serde(default = "default_true")]
    pub is_edit_link: bool,
    #[serde(default)]
    pub validation: Validation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// An entity definition as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_identifier")]
    pub identifier: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_view: Option<ViewConfig>,
    #[serde(default)]
    pub references: Vec<ReferenceDef>,
}

fn default_true() -> bool {
    true
}

fn default_identifier() -> String {
    "id".to_string()
}
