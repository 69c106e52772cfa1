use crate::AttributeKind;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid schema '{type_name}': {reason}")]
    InvalidSchema { type_name: String, reason: String },

    #[error("Component type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Component type '{type_name}' references unknown type '{reference}' in {field}")]
    UnknownTypeReference {
        type_name: String,
        field: &'static str,
        reference: String,
    },

    #[error("Unknown component type '{0}'")]
    UnknownType(String),

    #[error("Attribute '{name}' is not declared by component type '{type_name}'")]
    UnknownAttribute { type_name: String, name: String },

    #[error("Attribute '{name}' type mismatch: expected {expected}, found {found}")]
    AttributeTypeMismatch {
        name: String,
        expected: AttributeKind,
        found: String,
    },

    #[error("Attribute '{name}' is set more than once on a '{type_name}' component")]
    DuplicateAttribute { type_name: String, name: String },

    #[error("'{child}' cannot be placed under '{parent}': {reason}")]
    IllegalHierarchy {
        child: String,
        parent: String,
        reason: String,
    },
}

impl SchemaError {
    pub fn invalid_schema(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_attribute(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn type_mismatch(
        name: impl Into<String>,
        expected: AttributeKind,
        found: impl Into<String>,
    ) -> Self {
        Self::AttributeTypeMismatch {
            name: name.into(),
            expected,
            found: found.into(),
        }
    }

    pub fn illegal_hierarchy(
        child: impl Into<String>,
        parent: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self::IllegalHierarchy {
            child: child.into(),
            parent: parent.unwrap_or("<root>").to_string(),
            reason: reason.into(),
        }
    }
}
