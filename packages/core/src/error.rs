//! Error types for the plugin core

use crate::{CorrelationId, EventStatus};
use plugkit_common::CommonError;
use plugkit_schema::SchemaError;
use thiserror::Error;

pub type PluginResult<T> = Result<T, PluginError>;
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Violations of the event-correlation protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("No operation was started with id {0}")]
    UnknownCorrelation(CorrelationId),

    #[error("Operation {0} already reached a terminal status")]
    AlreadyTerminated(CorrelationId),

    #[error("Event is missing required field '{0}'")]
    MissingField(&'static str),

    /// Terminal statuses are only recorded when the orchestrator closes an
    /// operation
    #[error("Status {0:?} can only be set by closing the operation")]
    ReservedStatus(EventStatus),
}

/// Failure reported by a collaborator (data store, drawer, metadata,
/// parser or renderer)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("File error: {0}")]
    File(#[from] CommonError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{collaborator} failed: {message}")]
    Failed {
        collaborator: &'static str,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollaboratorError {
    pub fn failed(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            collaborator,
            message: message.into(),
        }
    }
}

/// Error returned by the orchestrator's operations.
///
/// Collaborator failures are passed through as they were returned.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),
}

impl PluginError {
    /// The collaborator failure this error carries, if any
    pub fn as_collaborator(&self) -> Option<&CollaboratorError> {
        match self {
            PluginError::Collaborator(err) => Some(err),
            PluginError::Event(_) => None,
        }
    }
}
