// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use onboard_core::{RoleId, SoftwareId};
use thiserror::Error;

/// The association-store operation which failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssociationOp {
    Attach,
    Detach,
}

impl fmt::Display for AssociationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach => write!(f, "attach"),
            Self::Detach => write!(f, "detach"),
        }
    }
}

/// Domain errors surfaced by the engine.
///
/// Callers map these onto their own transport (HTTP status codes or
/// otherwise); no raw store error passes through uninterpreted.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("software with id {0} not found")]
    SoftwareNotFound(SoftwareId),

    #[error("role with id {0} not found")]
    RoleNotFound(RoleId),

    /// A software record requires at least one role at creation time.
    /// Updates may legitimately reduce the role set to empty.
    #[error("at least one required role must be provided")]
    NoRolesProvided,

    #[error("{operation} failed for role {role_id}: {reason}")]
    AssociationWriteFailed {
        role_id: RoleId,
        operation: AssociationOp,
        reason: String,
    },

    /// A read-side store failure, wrapped so the underlying store technology
    /// does not leak into caller-facing error handling.
    #[error("store error: {0}")]
    Store(String),
}
