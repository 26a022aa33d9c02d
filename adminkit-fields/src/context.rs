//! AdminContext — loads entity definitions from disk.
//!
//! Manages entity definitions as YAML files under an `entities/` directory and
//! keeps the resolved [`Registry`] of entities and reference fields in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{FieldsError, Result};
use crate::registry::Registry;
use crate::types::EntityDef;

/// Builder for `AdminContext`. Created by `AdminContext::open()`.
pub struct AdminContextBuilder {
    root: PathBuf,
    create: bool,
}

impl AdminContextBuilder {
    /// Fail with `NotInitialized` instead of creating a missing `entities/`.
    pub fn existing_only(mut self) -> Self {
        self.create = false;
        self
    }

    /// Build the context: create directories, load from disk, resolve references.
    pub async fn build(self) -> Result<AdminContext> {
        let entities_dir = self.root.join("entities");
        if !entities_dir.is_dir() {
            if !self.create {
                return Err(FieldsError::NotInitialized { path: entities_dir });
            }
            fs::create_dir_all(&entities_dir).await?;
        }

        let loaded = load_entity_defs(&entities_dir).await?;
        let mut defs = Vec::with_capacity(loaded.len());
        let mut sources = HashMap::with_capacity(loaded.len());
        for (path, def) in loaded {
            sources.insert(def.name.clone(), path);
            defs.push(def);
        }
        let registry = Registry::from_defs(&defs)?;

        debug!(
            root = %self.root.display(),
            entities = defs.len(),
            "admin context opened"
        );

        Ok(AdminContext {
            root: self.root,
            defs,
            sources,
            registry,
        })
    }
}

/// Read every `.yaml` file in `entities/`, sorted by path, paired with its path.
async fn load_entity_defs(entities_dir: &Path) -> Result<Vec<(PathBuf, EntityDef)>> {
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(entities_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut defs = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).await?;
        match serde_yaml_ng::from_str::<EntityDef>(&content) {
            Ok(def) => defs.push((path, def)),
            Err(e) => {
                warn!(?path, %e, "skipping invalid entity definition");
            }
        }
    }
    Ok(defs)
}

/// Context for entity definitions and their resolved configuration.
///
/// Owns a directory on disk with the structure:
/// ```text
/// admin/
///   entities/    ← one .yaml per entity
/// ```
pub struct AdminContext {
    root: PathBuf,
    defs: Vec<EntityDef>,
    /// File each loaded definition came from, keyed by entity name.
    sources: HashMap<String, PathBuf>,
    registry: Registry,
}

impl AdminContext {
    /// Open or create an admin directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let ctx = AdminContext::open(path).build().await?;
    /// let author = ctx.registry().reference("post", "author_id");
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> AdminContextBuilder {
        AdminContextBuilder {
            root: root.into(),
            create: true,
        }
    }

    /// The resolved entities and reference fields.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access, used to hand fetched entries to reference fields.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Get an entity definition by name.
    pub fn get_entity_def(&self, name: &str) -> Option<&EntityDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// All entity definitions, in load order.
    pub fn all_entity_defs(&self) -> &[EntityDef] {
        &self.defs
    }

    /// Write (create or update) an entity definition.
    ///
    /// The definitions are re-resolved before anything is persisted, so a
    /// definition that points at an unknown entity or field is rejected and
    /// leaves both disk and memory untouched. An existing definition is
    /// written back to the file it was loaded from; a new one goes to
    /// `entities/<name>.yaml`.
    pub async fn write_entity(&mut self, def: &EntityDef) -> Result<()> {
        validate_entity_name(&def.name)?;

        let mut defs = self.defs.clone();
        match defs.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => *existing = def.clone(),
            None => defs.push(def.clone()),
        }
        let registry = Registry::from_defs(&defs)?;

        let path = self
            .sources
            .get(&def.name)
            .cloned()
            .unwrap_or_else(|| self.entity_path(&def.name));
        let yaml = serde_yaml_ng::to_string(def)?;
        atomic_write(&path, yaml.as_bytes()).await?;
        debug!(name = %def.name, path = %path.display(), "entity definition written");

        self.sources.insert(def.name.clone(), path);
        self.defs = defs;
        self.registry = registry;
        Ok(())
    }

    /// The root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_path(&self, name: &str) -> PathBuf {
        self.root.join("entities").join(format!("{name}.yaml"))
    }
}

/// Entity names become file names, so they must stay inside `entities/`.
fn validate_entity_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if invalid {
        return Err(FieldsError::InvalidEntityName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
