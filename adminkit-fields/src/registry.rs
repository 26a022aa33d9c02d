//! Resolution of entity definitions into shared entities and reference fields.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::entity::Entity;
use crate::error::{FieldsError, Result};
use crate::field::FieldBase;
use crate::reference::ReferenceField;
use crate::types::{EntityDef, FieldKind, ReferenceDef, Transform};
use crate::view::View;

/// Resolved entities and the reference fields declared on each of them.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: IndexMap<String, Arc<Entity>>,
    references: IndexMap<String, Vec<ReferenceField>>,
}

impl Registry {
    /// Build every entity first, then resolve reference fields against them.
    ///
    /// A reference may target any entity in `defs`, including its own.
    pub fn from_defs(defs: &[EntityDef]) -> Result<Self> {
        let mut entities = IndexMap::with_capacity(defs.len());
        for def in defs {
            if entities.contains_key(&def.name) {
                return Err(FieldsError::DuplicateEntity {
                    name: def.name.clone(),
                });
            }
            entities.insert(def.name.clone(), Arc::new(build_entity(def)));
        }

        let mut references = IndexMap::with_capacity(defs.len());
        for def in defs {
            let fields = def
                .references
                .iter()
                .map(|r| build_reference(r, &entities))
                .collect::<Result<Vec<_>>>()?;
            references.insert(def.name.clone(), fields);
        }

        debug!(
            entities = entities.len(),
            references = references.values().map(Vec::len).sum::<usize>(),
            "registry resolved"
        );

        Ok(Self {
            entities,
            references,
        })
    }

    pub fn get_entity(&self, name: &str) -> Option<&Arc<Entity>> {
        self.entities.get(name)
    }

    /// All entities, in definition order.
    pub fn entities(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.entities.values()
    }

    /// Reference fields declared on an entity, in declaration order.
    pub fn references_for(&self, entity: &str) -> &[ReferenceField] {
        self.references
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn reference(&self, entity: &str, field: &str) -> Option<&ReferenceField> {
        self.references_for(entity)
            .iter()
            .find(|r| r.name() == field)
    }

    pub fn reference_mut(&mut self, entity: &str, field: &str) -> Option<&mut ReferenceField> {
        self.references
            .get_mut(entity)?
            .iter_mut()
            .find(|r| r.name() == field)
    }
}

fn build_entity(def: &EntityDef) -> Entity {
    let identifier = def
        .fields
        .iter()
        .find(|f| f.name == def.identifier)
        .map(FieldBase::from_def)
        .unwrap_or_else(|| FieldBase::new(def.identifier.clone(), FieldKind::Number));

    let mut entity = Entity::new(def.name.clone()).with_identifier(identifier);
    if let Some(label) = &def.label {
        entity = entity.with_label(label.clone());
    }
    for field in def.fields.iter().filter(|f| f.name != def.identifier) {
        entity = entity.with_field(FieldBase::from_def(field));
    }
    if let Some(config) = &def.list_view {
        entity = entity.with_view(View::list().with_config(config.clone()));
    }
    entity
}

fn build_reference(
    def: &ReferenceDef,
    entities: &IndexMap<String, Arc<Entity>>,
) -> Result<ReferenceField> {
    let target = entities
        .get(&def.target_entity)
        .ok_or_else(|| FieldsError::EntityNotFound {
            name: def.target_entity.clone(),
        })?;
    let label_field = target
        .field(&def.target_field)
        .ok_or_else(|| FieldsError::FieldNotFound {
            entity: def.target_entity.clone(),
            name: def.target_field.clone(),
        })?;

    let mut field = ReferenceField::new(def.name.clone());
    if let Some(label) = &def.label {
        field.set_label(label.clone());
    }
    if let Some(max_chars) = def.truncate_list {
        field.set_truncate_list(Transform::truncate(max_chars));
    }
    field
        .set_list(def.list)
        .set_is_edit_link(def.is_edit_link)
        .set_validation(def.validation)
        .set_default_value(def.default.clone())
        .set_target_entity(Arc::clone(target))
        .set_target_field(Arc::clone(label_field));
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::view::ViewKind;
    use serde_json::json;

    fn defs(yaml: &str) -> Vec<EntityDef> {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    const BLOG: &str = r#"
- name: post
  fields:
    - name: title
  references:
    - name: author_id
      label: Author
      target_entity: user
      target_field: name
      truncate_list: 4
    - name: parent_id
      target_entity: post
      target_field: title
- name: user
  identifier: uuid
  fields:
    - name: uuid
      type: string
    - name: name
  list_view:
    title: Users
    per_page: 10
"#;

    #[test]
    fn resolves_entities_and_references() {
        let registry = Registry::from_defs(&defs(BLOG)).unwrap();
        let names: Vec<_> = registry.entities().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["post", "user"]);

        let user = registry.get_entity("user").unwrap();
        assert_eq!(user.identifier().name(), "uuid");
        assert_eq!(user.identifier().kind(), FieldKind::String);
        assert_eq!(user.fields().len(), 1);
        assert!(user.get_one_view_of_type(ViewKind::List).is_some());

        let post = registry.get_entity("post").unwrap();
        assert_eq!(post.identifier().name(), "id");
        assert_eq!(post.identifier().kind(), FieldKind::Number);

        let author = registry.reference("post", "author_id").unwrap();
        assert_eq!(author.label(), "Author");
        assert!(Arc::ptr_eq(author.target_entity().unwrap(), user));
        assert_eq!(author.target_field().unwrap().name(), "name");
        assert_eq!(author.get_truncated_list_value(json!("Alexander")), json!("Alex..."));
    }

    #[test]
    fn self_reference_resolves() {
        let registry = Registry::from_defs(&defs(BLOG)).unwrap();
        let parent = registry.reference("post", "parent_id").unwrap();
        assert_eq!(parent.target_entity().unwrap().name(), "post");
        assert_eq!(parent.label(), "My reference");
        assert!(!parent.truncate_list().is_enabled());
    }

    #[test]
    fn resolved_reference_builds_choices() {
        let mut registry = Registry::from_defs(&defs(BLOG)).unwrap();
        let author = registry.reference_mut("post", "author_id").unwrap();
        author.set_entries(vec![
            json!({"uuid": "u1", "name": "Ann"}).as_object().unwrap().clone(),
            json!({"uuid": "u2", "name": "Bob"}).as_object().unwrap().clone(),
        ]);
        let choices = author.get_choices().unwrap();
        assert_eq!(choices["u1"], json!("Ann"));
        assert_eq!(choices["u2"], json!("Bob"));

        let view = author.get_referenced_view().unwrap();
        assert_eq!(view.config().title.as_deref(), Some("Users"));
        assert!(!view.config().pagination);
    }

    #[test]
    fn references_for_unknown_entity_is_empty() {
        let registry = Registry::from_defs(&defs(BLOG)).unwrap();
        assert!(registry.references_for("comment").is_empty());
        assert!(registry.reference("post", "missing").is_none());
    }

    #[test]
    fn unknown_target_entity_errors() {
        let result = Registry::from_defs(&defs(
            r#"
- name: post
  references:
    - name: author_id
      target_entity: user
      target_field: name
"#,
        ));
        assert!(matches!(result, Err(FieldsError::EntityNotFound { name }) if name == "user"));
    }

    #[test]
    fn unknown_target_field_errors() {
        let result = Registry::from_defs(&defs(
            r#"
- name: user
- name: post
  references:
    - name: author_id
      target_entity: user
      target_field: nickname
"#,
        ));
        assert!(matches!(
            result,
            Err(FieldsError::FieldNotFound { entity, name }) if entity == "user" && name == "nickname"
        ));
    }

    #[test]
    fn duplicate_entity_errors() {
        let result = Registry::from_defs(&defs("- name: user\n- name: user\n"));
        assert!(matches!(result, Err(FieldsError::DuplicateEntity { name }) if name == "user"));
    }

    #[test]
    fn reference_default_value_is_applied() {
        let mut registry = Registry::from_defs(&defs(
            r#"
- name: category
  fields:
    - name: title
- name: post
  references:
    - name: category_id
      target_entity: category
      target_field: title
      default: 1
"#,
        ))
        .unwrap();
        let field = registry.reference_mut("post", "category_id").unwrap();
        field.process_default_value();
        assert_eq!(field.value(), Some(&json!(1)));
    }
}
