//! Synchronous API client for the Instatus status-page service.
//!
//! # Overview
//! Maps status pages and components to and from the Instatus REST API. Every
//! operation is available both as a `build_*` / `parse_*` pair over plain
//! `HttpRequest` / `HttpResponse` values and as a single call that runs the
//! round-trip through a `Transport`.
//!
//! # Design
//! - `InstatusClient` holds only a `ClientConfig` and a shared transport; no
//!   state survives between calls.
//! - Version and auth skew between endpoints lives in `endpoint`, one
//!   constant descriptor per operation.
//! - Request and response shapes differ per direction, so `types` keeps one
//!   DTO per direction next to the flat domain entities.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::InstatusClient;
pub use config::ClientConfig;
pub use error::{ApiError, StepFailure};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Component, ComponentStatus, Page, PageUpdate};
