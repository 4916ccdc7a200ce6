// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data types for the onboard software catalogue: roles, software artifacts
//! and the payloads used to create and partially update them.
//!
//! This crate holds plain data only. Persistence interfaces live in
//! `onboard-store` and all behaviour (reconciliation, software operations) in
//! `onboard-engine`.
mod identifiers;
mod role;
mod software;

pub use identifiers::{IdError, RoleId, SoftwareId};
pub use role::Role;
pub use software::{NewSoftware, Software, SoftwarePatch};
