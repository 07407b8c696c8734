//! Declarative management of Instatus status pages and components.
//!
//! # Overview
//! The host calls `Provider` once per lifecycle phase of a resource instance
//! (create, read, update, delete, import). The provider validates the flat
//! attribute bag against the resource schema, checks the lifecycle
//! transition, and hands off to the `Resource` implementation, which maps
//! attributes onto `instatus_core` client calls and writes the results back.
//!
//! # Design
//! - `Resource` has one method per phase; import is optional.
//! - Errors are `ProviderError` values that convert into host diagnostics.
//!   Non-fatal conditions, such as a page read endpoint that is not
//!   configured, come back as warnings and leave state untouched.
//! - The provider keeps no state of its own beyond the shared client.

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod lifecycle;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod schema;

pub use config::ProviderConfig;
pub use data::ResourceData;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::ProviderError;
pub use lifecycle::{InstanceState, Operation};
pub use provider::Provider;
pub use resource::Resource;
pub use schema::{Attribute, AttributeType, Presence, Schema};
