//! Error types for the fields configuration model

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while configuring or querying fields
#[derive(Debug, Error)]
pub enum FieldsError {
    /// A reference field was queried before its target entity was set
    #[error("reference field '{field}' has no target entity")]
    MissingTargetEntity { field: String },

    /// A reference field was queried before its target field was set
    #[error("reference field '{field}' has no target field")]
    MissingTargetField { field: String },

    /// Entity not found by name
    #[error("entity not found: {name}")]
    EntityNotFound { name: String },

    /// Field not found on an entity
    #[error("field not found: {entity}.{name}")]
    FieldNotFound { entity: String, name: String },

    /// Two entity definitions share a name
    #[error("duplicate entity name: {name}")]
    DuplicateEntity { name: String },

    /// Entity name cannot be used as a file name
    #[error("invalid entity name: {name:?}")]
    InvalidEntityName { name: String },

    /// Entities directory not found
    #[error("entities directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::EntityNotFound {
            name: "user".into(),
        };
        assert_eq!(err.to_string(), "entity not found: user");
    }

    #[test]
    fn test_missing_target_names_field() {
        let err = FieldsError::MissingTargetField {
            field: "author_id".into(),
        };
        assert!(err.to_string().contains("author_id"));
        assert!(err.to_string().contains("target field"));
    }

    #[test]
    fn test_invalid_entity_name_is_quoted() {
        let err = FieldsError::InvalidEntityName {
            name: "../x".into(),
        };
        assert_eq!(err.to_string(), "invalid entity name: \"../x\"");
    }

    #[test]
    fn test_field_not_found_is_qualified() {
        let err = FieldsError::FieldNotFound {
            entity: "user".into(),
            name: "nickname".into(),
        };
        assert_eq!(err.to_string(), "field not found: user.nickname");
    }
}
