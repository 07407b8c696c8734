//! Errors raised by resource callbacks.
//!
//! Every variant renders as a user-facing diagnostic through
//! `From<ProviderError> for Diagnostic`.

use instatus_core::ApiError;
use thiserror::Error;

use crate::lifecycle::{InstanceState, Operation};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// A client call failed. `action` reads like "creating status page".
    #[error("error {action}: {source}")]
    Api {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("missing required attribute `{0}`")]
    MissingAttribute(String),

    #[error("attribute `{name}` must be a {expected}, got {found}")]
    AttributeType {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("resource has no identifier")]
    MissingId,

    #[error("status page {0} has no stored workspace_id, so its workspace cannot be deleted")]
    MissingWorkspaceId(String),

    #[error("cannot {operation} a resource that is {state}")]
    InvalidTransition {
        operation: Operation,
        state: InstanceState,
    },

    #[error("unknown resource type `{0}`")]
    UnknownResourceType(String),

    #[error("{0} does not support import")]
    ImportUnsupported(&'static str),

    #[error("invalid import id {id:?}, expected {expected}")]
    InvalidImportId { id: String, expected: &'static str },

    #[error("invalid provider configuration: {0}")]
    Config(String),
}

impl ProviderError {
    pub fn api(action: &'static str, source: ApiError) -> Self {
        ProviderError::Api { action, source }
    }

    /// The attribute this error is about, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            ProviderError::MissingAttribute(name)
            | ProviderError::UnknownAttribute(name)
            | ProviderError::AttributeType { name, .. }
            | ProviderError::InvalidValue { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}
