//! Views describe how an entity's records are rendered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::field::FieldBase;

/// The kind of a view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    List,
    Show,
    Edit,
    Create,
    Delete,
}

/// Sort direction of a list view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// Rendering options of a view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_pagination")]
    pub pagination: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_dir: SortDir,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            per_page: default_per_page(),
            pagination: default_pagination(),
            sort_field: None,
            sort_dir: SortDir::default(),
        }
    }
}

fn default_per_page() -> u32 {
    30
}

fn default_pagination() -> bool {
    true
}

/// A view over one entity: which fields it shows and how.
#[derive(Debug, Clone)]
pub struct View {
    kind: ViewKind,
    entity: Option<Arc<Entity>>,
    fields: Vec<Arc<FieldBase>>,
    config: ViewConfig,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            entity: None,
            fields: Vec::new(),
            config: ViewConfig::default(),
        }
    }

    /// An empty list view.
    pub fn list() -> Self {
        Self::new(ViewKind::List)
    }

    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn entity(&self) -> Option<&Arc<Entity>> {
        self.entity.as_ref()
    }

    pub fn set_entity(&mut self, entity: Arc<Entity>) -> &mut Self {
        self.entity = Some(entity);
        self
    }

    pub fn fields(&self) -> &[Arc<FieldBase>] {
        &self.fields
    }

    pub fn add_field(&mut self, field: Arc<FieldBase>) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Drop every field from the view.
    pub fn remove_fields(&mut self) -> &mut Self {
        self.fields.clear();
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ViewConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: ViewConfig) -> &mut Self {
        self.config = config;
        self
    }
}
