//! Entities: a named record type with an identifier, fields and views.

use std::sync::Arc;

use crate::field::FieldBase;
use crate::types::FieldKind;
use crate::view::{View, ViewKind};

/// An entity managed by the admin panel.
///
/// Built once with the chained `with_*` methods, then shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    label: String,
    identifier: Arc<FieldBase>,
    fields: Vec<Arc<FieldBase>>,
    views: Vec<View>,
}

impl Entity {
    /// Create an entity identified by a numeric `id` field.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            identifier: Arc::new(FieldBase::new("id", FieldKind::Number)),
            fields: Vec::new(),
            views: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_identifier(mut self, identifier: FieldBase) -> Self {
        self.identifier = Arc::new(identifier);
        self
    }

    pub fn with_field(mut self, field: FieldBase) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn identifier(&self) -> &Arc<FieldBase> {
        &self.identifier
    }

    pub fn fields(&self) -> &[Arc<FieldBase>] {
        &self.fields
    }

    /// Look up a field by name. The identifier field is included.
    pub fn field(&self, name: &str) -> Option<&Arc<FieldBase>> {
        if self.identifier.name() == name {
            return Some(&self.identifier);
        }
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// The first view of the given kind, if any.
    pub fn get_one_view_of_type(&self, kind: ViewKind) -> Option<&View> {
        self.views.iter().find(|v| v.kind() == kind)
    }
}
