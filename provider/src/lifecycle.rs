//! Per-instance lifecycle state driven by host callbacks.

use std::fmt;

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstanceState {
    #[default]
    Absent,
    Planned,
    Present,
    TaintedForDelete,
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstanceState::Absent => "absent",
            InstanceState::Planned => "planned",
            InstanceState::Present => "present",
            InstanceState::TaintedForDelete => "tainted for delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Plan,
    Create,
    Read,
    Update,
    Delete,
    Import,
    Taint,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Plan => "plan",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
            Operation::Taint => "taint",
        })
    }
}

impl InstanceState {
    /// State after `op` succeeds from `self`, or `InvalidTransition`.
    ///
    /// `Read` keeps `Present`; the caller moves to `Absent` itself when the
    /// remote object turned out to be gone.
    pub fn transition(self, op: Operation) -> Result<InstanceState, ProviderError> {
        use InstanceState::*;
        use Operation::*;

        let next = match (self, op) {
            (Absent, Plan) => Planned,
            (Absent | Planned, Create) => Present,
            (Present, Read) => Present,
            (Present, Update) => Present,
            (Present, Taint) => TaintedForDelete,
            (Present | TaintedForDelete, Delete) => Absent,
            (Absent, Import) => Present,
            (state, operation) => {
                return Err(ProviderError::InvalidTransition {
                    operation,
                    state,
                })
            }
        };
        Ok(next)
    }
}
