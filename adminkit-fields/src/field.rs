//! The `Field` capability and the plain `FieldBase` implementation.

use serde_json::Value;

use crate::types::{is_blank, DefaultValue, FieldDef, FieldKind, Validation};

/// State shared by every field: identity, display flags, validation and the
/// current value.
#[derive(Debug, Clone)]
pub struct FieldBase {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) label: String,
    pub(crate) list: bool,
    pub(crate) is_edit_link: bool,
    pub(crate) validation: Validation,
    pub(crate) default_value: DefaultValue,
    pub(crate) value: Option<Value>,
}

impl FieldBase {
    /// Create a field. The label defaults to the name.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            list: true,
            is_edit_link: false,
            validation: Validation::default(),
            default_value: DefaultValue::None,
            value: None,
        }
    }

    pub fn from_def(def: &FieldDef) -> Self {
        let mut field = Self::new(def.name.clone(), def.kind);
        if let Some(label) = &def.label {
            field.set_label(label.clone());
        }
        field
            .set_list(def.list)
            .set_validation(def.validation)
            .set_default_value(def.default.clone());
        field
    }
}

configurable!(FieldBase {
    /// Property name of the field in records.
    ref name / set_name: String => name;
    ref label / set_label: String => label;
    /// Whether the field appears in list views.
    copy list / set_list: bool => list;
    /// Whether list rendering links to the edit page.
    copy is_edit_link / set_is_edit_link: bool => is_edit_link;
    copy validation / set_validation: Validation => validation;
    ref default_value_config / set_default_value: DefaultValue => default_value;
});

/// Capabilities every field offers to the rendering layer.
pub trait Field {
    fn base(&self) -> &FieldBase;

    fn base_mut(&mut self) -> &mut FieldBase;

    fn kind(&self) -> FieldKind {
        self.base().kind
    }

    fn value(&self) -> Option<&Value> {
        self.base().value.as_ref()
    }

    fn set_value(&mut self, value: Option<Value>) {
        self.base_mut().value = value;
    }

    /// The resolved default, or `None` when the default is absent or blank.
    fn default_value(&self) -> Option<Value> {
        self.base().default_value.resolve()
    }

    fn is_required(&self) -> bool {
        self.base().validation.required
    }

    /// Fill a blank value from the default.
    fn process_default_value(&mut self) {
        if self.value().is_some_and(|v| !is_blank(v)) {
            return;
        }
        if let Some(default) = self.default_value() {
            self.set_value(Some(default));
        }
    }
}

impl Field for FieldBase {
    fn base(&self) -> &FieldBase {
        self
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_field_defaults() {
        let field = FieldBase::new("title", FieldKind::String);
        assert_eq!(field.name(), "title");
        assert_eq!(field.label(), "title");
        assert_eq!(field.kind(), FieldKind::String);
        assert!(field.list());
        assert!(!field.is_required());
        assert!(field.value().is_none());
    }

    #[test]
    fn accessors_chain() {
        let mut field = FieldBase::new("title", FieldKind::String);
        field
            .set_label("Title")
            .set_list(false)
            .set_validation(Validation::required());
        assert_eq!(field.label(), "Title");
        assert!(!field.list());
        assert!(field.is_required());
    }

    #[test]
    fn process_default_fills_blank_value() {
        let mut field = FieldBase::new("status", FieldKind::String);
        field.set_default_value(json!("draft"));
        field.process_default_value();
        assert_eq!(field.value(), Some(&json!("draft")));

        let mut field = FieldBase::new("status", FieldKind::String);
        field.set_default_value(json!("draft"));
        field.set_value(Some(json!("")));
        field.process_default_value();
        assert_eq!(field.value(), Some(&json!("draft")));
    }

    #[test]
    fn process_default_keeps_existing_value() {
        let mut field = FieldBase::new("status", FieldKind::String);
        field.set_default_value(json!("draft"));
        field.set_value(Some(json!("published")));
        field.process_default_value();
        assert_eq!(field.value(), Some(&json!("published")));
    }

    #[test]
    fn process_default_keeps_zero() {
        let mut field = FieldBase::new("count", FieldKind::Number);
        field.set_default_value(json!(10));
        field.set_value(Some(json!(0)));
        field.process_default_value();
        assert_eq!(field.value(), Some(&json!(0)));
    }

    #[test]
    fn from_def_copies_settings() {
        let def: FieldDef = serde_yaml_ng::from_str(
            "name: email\ntype: string\nlabel: E-mail\nlist: false\nvalidation:\n  required: true\n",
        )
        .unwrap();
        let field = FieldBase::from_def(&def);
        assert_eq!(field.name(), "email");
        assert_eq!(field.label(), "E-mail");
        assert!(!field.list());
        assert!(field.is_required());
    }
}
