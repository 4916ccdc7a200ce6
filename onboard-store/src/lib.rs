// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces and implementations of persistence layers for the onboard
//! domain: roles, software records and the software↔role association.
//!
//! Three store interfaces are defined, one per collaborator the
//! reconciliation engine consumes:
//!
//! - [`RoleStore`] for role records,
//! - [`SoftwareStore`] for software records,
//! - [`AssociationStore`] for the many-to-many software↔role relation.
//!
//! Each interface comes in two variants: one which is thread-safe
//! (implementing `Send`) and one which is purely intended for
//! single-threaded execution contexts (the `Local*` traits).
//!
//! The association relation holds each `(software_id, role_id)` pair at most
//! once. Implementations must make `attach` idempotent (attaching a pair
//! which is already present is a no-op reported as `false`) and `detach`
//! tolerant of absent pairs for the same reason; the reconciliation engine
//! relies on both properties when a plan is retried.
//!
//! ## Store implementations
//!
//! An in-memory solution is provided in the form of a [`MemoryStore`] which
//! implements all three interfaces. The store is gated by the `memory`
//! feature flag and is enabled by default.
//!
//! A SQLite solution is provided in the form of a `SqliteStore` which also
//! implements all three interfaces. The store is gated by the `sqlite`
//! feature flag and is disabled by default.
#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod stores;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::store::{SqliteStore, SqliteStoreError};
pub use stores::{
    AssociationStore, LocalAssociationStore, LocalRoleStore, LocalSoftwareStore, RoleStore,
    SoftwareStore,
};
