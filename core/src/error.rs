//! Error types for the Instatus API client.
//!
//! # Design
//! Every non-2xx response lands in `Http` with the raw status code and body so
//! the provider can show the server's own explanation. `Unsupported` is kept
//! apart from transport and HTTP failures because callers treat a missing
//! capability as an expected condition rather than drift.

use thiserror::Error;

/// Errors returned by `InstatusClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The operation has no backing endpoint in the current configuration.
    #[error("{0} is not supported by the Instatus API in this configuration")]
    Unsupported(String),

    /// A path parameter was empty.
    #[error("missing identifier: {0}")]
    MissingIdentifier(&'static str),

    /// A path parameter would name a different path segment (`.` or `..`).
    #[error("invalid identifier for {name}: {value:?}")]
    InvalidIdentifier { name: &'static str, value: String },

    /// One or more steps of a multi-request operation failed.
    #[error("{}", aggregate_message(.0))]
    Aggregate(Vec<StepFailure>),
}

/// A single failed step of a multi-request operation.
#[derive(Debug, Error)]
#[error("{step}: {error}")]
pub struct StepFailure {
    pub step: &'static str,
    pub error: Box<ApiError>,
}

impl StepFailure {
    pub fn new(step: &'static str, error: ApiError) -> Self {
        Self {
            step,
            error: Box::new(error),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ApiError::Unsupported(_))
    }

    /// Whether `step` is among the failures of an `Aggregate`.
    pub fn failed_step(&self, step: &str) -> bool {
        match self {
            ApiError::Aggregate(failures) => failures.iter().any(|f| f.step == step),
            _ => false,
        }
    }
}

fn aggregate_message(failures: &[StepFailure]) -> String {
    let steps: Vec<String> = failures.iter().map(ToString::to_string).collect();
    format!("{} step(s) failed: {}", failures.len(), steps.join("; "))
}
