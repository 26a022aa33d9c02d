//! Field and reference-field configuration model for admin panels
//!
//! `adminkit-fields` describes the entities an admin panel manages, the fields
//! and views of each entity, and reference fields that point from one entity
//! to records of another. It holds configuration only; fetching records and
//! rendering them belong to the consumer.
//!
//! # Architecture
//!
//! - **Typed accessors**: properties get a getter and a chained `set_*` setter
//! - **Composition**: `ReferenceField` embeds a `FieldBase` and implements `Field`
//! - **Shared configuration**: entities and target fields live behind `Arc`
//! - **YAML on disk**: one `.yaml` file per entity, resolved into a `Registry`

#[macro_use]
mod configurable;

pub mod context;
pub mod entity;
pub mod error;
pub mod field;
pub mod reference;
pub mod registry;
pub mod types;
pub mod view;

pub use context::{AdminContext, AdminContextBuilder};
pub use entity::Entity;
pub use error::{FieldsError, Result};
pub use field::{Field, FieldBase};
pub use reference::ReferenceField;
pub use registry::Registry;
pub use types::{
    is_blank, Choices, DefaultValue, EntityDef, FieldDef, FieldKind, Record, ReferenceDef,
    Transform, Validation,
};
pub use view::{SortDir, View, ViewConfig, ViewKind};
