// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role reconciliation engine for the onboard software catalogue.
//!
//! A software artifact carries a set of required roles, persisted as
//! `(software_id, role_id)` pairs in an association store. When a caller
//! supplies a new desired role set, the engine computes the minimal delta
//! between the current and desired sets ([`reconcile`]) and applies exactly
//! the attachments and detachments needed ([`apply_plan`]).
//!
//! Additions are validated fail-fast: once any requested role id is unknown,
//! no attachment is performed at all. Removals are best-effort: every
//! detachment is attempted independently and failures are collected into the
//! [`ApplyReport`] instead of aborting the pass.
//!
//! The engine holds no state of its own; all state lives in the stores
//! passed into each operation. Consistency across a reconcile-apply cycle is
//! the responsibility of the caller's transaction boundary.
mod apply;
mod error;
mod reconcile;
mod software;
#[cfg(test)]
mod test_utils;

pub use apply::{ApplyReport, RemovalFailure, apply_plan, validate_roles_exist};
pub use error::{AssociationOp, EngineError};
pub use reconcile::{ReconciliationPlan, reconcile};
pub use software::{
    SoftwareView, create_software, delete_software, get_software, list_software, update_software,
};
