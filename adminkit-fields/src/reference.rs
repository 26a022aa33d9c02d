//! Reference fields: a field whose value identifies a record in another entity.
//!
//! A `ReferenceField` names a target entity and the target field used as the
//! display label. Once the rendering layer has fetched the target records and
//! handed them over with [`ReferenceField::set_entries`], the field can build
//! the identifier → label [`Choices`] for selection controls, and it exposes an
//! embedded list view derived from the target entity's own list view.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::entity::Entity;
use crate::error::{FieldsError, Result};
use crate::field::{Field, FieldBase};
use crate::types::{Choices, FieldKind, Record, Transform};
use crate::view::{View, ViewKind};

const DEFAULT_NAME: &str = "reference";
const DEFAULT_LABEL: &str = "My reference";

/// Whether the referenced view has been derived from the target entity yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferencedViewState {
    Unconfigured,
    Configured,
}

/// A field pointing at a record of another entity.
#[derive(Debug, Clone)]
pub struct ReferenceField {
    base: FieldBase,
    target_entity: Option<Arc<Entity>>,
    target_field: Option<Arc<FieldBase>>,
    value_transformer: Transform,
    truncate_list: Transform,
    entries: Vec<Record>,
    referenced_value: Option<Value>,
    referenced_view: View,
    referenced_view_state: ReferencedViewState,
}

impl ReferenceField {
    pub fn new(name: impl Into<String>) -> Self {
        let mut base = FieldBase::new(name, FieldKind::Reference);
        base.set_label(DEFAULT_LABEL).set_is_edit_link(true);
        Self {
            base,
            target_entity: None,
            target_field: None,
            value_transformer: Transform::Disabled,
            truncate_list: Transform::Disabled,
            entries: Vec::new(),
            referenced_value: None,
            referenced_view: View::list(),
            referenced_view_state: ReferencedViewState::Unconfigured,
        }
    }

    pub fn target_entity(&self) -> Option<&Arc<Entity>> {
        self.target_entity.as_ref()
    }

    /// Set the target entity and forward it to the referenced view.
    pub fn set_target_entity(&mut self, entity: Arc<Entity>) -> &mut Self {
        self.referenced_view.set_entity(Arc::clone(&entity));
        self.target_entity = Some(entity);
        self
    }

    pub fn target_field(&self) -> Option<&Arc<FieldBase>> {
        self.target_field.as_ref()
    }

    /// Set the label field. The referenced view then shows exactly this field.
    pub fn set_target_field(&mut self, field: Arc<FieldBase>) -> &mut Self {
        self.referenced_view
            .remove_fields()
            .add_field(Arc::clone(&field));
        self.target_field = Some(field);
        self
    }

    /// Build the identifier → label map from the loaded entries.
    ///
    /// Later entries overwrite earlier ones sharing an identifier. Entries
    /// without an identifier are skipped; a missing label maps to `null`.
    /// Integral numbers key as integers, so `1` and `1.0` share the key `"1"`.
    pub fn get_choices(&self) -> Result<Choices> {
        let entity = self.require_target_entity()?;
        let label_field = self
            .target_field
            .as_ref()
            .ok_or_else(|| FieldsError::MissingTargetField {
                field: self.base.name().clone(),
            })?;

        let label_name = label_field.name();
        let identifier_name = entity.identifier().name();

        let mut choices = Choices::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(key) = entry.get(identifier_name).and_then(choice_key) else {
                debug!(
                    field = %self.base.name(),
                    identifier = %identifier_name,
                    "skipping entry without identifier"
                );
                continue;
            };
            let label = entry.get(label_name).cloned().unwrap_or(Value::Null);
            choices.insert(key, label);
        }

        debug!(
            field = %self.base.name(),
            entries = self.entries.len(),
            choices = choices.len(),
            "built reference choices"
        );
        Ok(choices)
    }

    /// The embedded list view, configured from the target entity on first use.
    ///
    /// The first call copies the target's list view configuration with
    /// pagination disabled. If the target has no list view the defaults are
    /// kept. Either way later calls return the same view unchanged.
    pub fn get_referenced_view(&mut self) -> Result<&View> {
        if self.referenced_view_state == ReferencedViewState::Unconfigured {
            let entity = self
                .target_entity
                .as_ref()
                .ok_or_else(|| FieldsError::MissingTargetEntity {
                    field: self.base.name().clone(),
                })?;

            match entity.get_one_view_of_type(ViewKind::List) {
                Some(list_view) => {
                    let mut config = list_view.config().clone();
                    config.pagination = false;
                    self.referenced_view.set_config(config);
                    debug!(
                        field = %self.base.name(),
                        entity = %entity.name(),
                        "referenced view configured from target list view"
                    );
                }
                None => {
                    debug!(
                        field = %self.base.name(),
                        entity = %entity.name(),
                        "target entity has no list view, keeping defaults"
                    );
                }
            }
            self.referenced_view_state = ReferencedViewState::Configured;
        }

        Ok(&self.referenced_view)
    }

    pub fn is_referenced_view_configured(&self) -> bool {
        self.referenced_view_state == ReferencedViewState::Configured
    }

    /// Apply `truncate_list` to a value shown in a list.
    pub fn get_truncated_list_value(&self, value: Value) -> Value {
        self.truncate_list.apply(value)
    }

    /// Apply the value transformer.
    pub fn transform_value(&self, value: Value) -> Value {
        self.value_transformer.apply(value)
    }

    pub fn get_entries(&self) -> &[Record] {
        &self.entries
    }

    /// Replace the loaded target records.
    pub fn set_entries(&mut self, entries: Vec<Record>) -> &mut Self {
        debug!(
            field = %self.base.name(),
            previous = self.entries.len(),
            count = entries.len(),
            "replacing reference entries"
        );
        self.entries = entries;
        self
    }

    /// Empty the field value.
    pub fn clear(&mut self) -> &mut Self {
        self.set_value(None);
        self
    }

    /// The display value resolved by the rendering layer.
    pub fn get_list_value(&self) -> Option<&Value> {
        self.referenced_value.as_ref()
    }

    pub fn set_referenced_value(&mut self, value: impl Into<Option<Value>>) -> &mut Self {
        self.referenced_value = value.into();
        self
    }

    fn require_target_entity(&self) -> Result<&Arc<Entity>> {
        self.target_entity
            .as_ref()
            .ok_or_else(|| FieldsError::MissingTargetEntity {
                field: self.base.name().clone(),
            })
    }
}

configurable!(ReferenceField {
    ref name / set_name: String => base.name;
    ref label / set_label: String => base.label;
    copy list / set_list: bool => base.list;
    copy is_edit_link / set_is_edit_link: bool => base.is_edit_link;
    copy validation / set_validation: crate::types::Validation => base.validation;
    ref default_value_config / set_default_value: crate::types::DefaultValue => base.default_value;
    /// Function mapping a stored value before it is sent back.
    ref value_transformer / set_value_transformer: Transform => value_transformer;
    /// Function shortening long values in list views.
    ref truncate_list / set_truncate_list: Transform => truncate_list;
});

impl Default for ReferenceField {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl Field for ReferenceField {
    fn base(&self) -> &FieldBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Reference
    }
}

/// Largest float that still holds every integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Render an identifier value as a choice key.
fn choice_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
                Some((f as i64).to_string())
            }
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}
