// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for queries and writes on role, software and
//! association state.
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};

use onboard_core::{Role, RoleId, Software, SoftwareId, SoftwarePatch};

/// Interface for storing, deleting and querying roles.
///
/// Two variants of the trait are provided: one which is thread-safe
/// (implementing `Sync`) and one which is purely intended for
/// single-threaded execution contexts.
#[trait_variant::make(RoleStore: Send)]
pub trait LocalRoleStore: Clone {
    type Error: Display + Debug;

    /// Insert a role.
    ///
    /// Returns `true` when the insert occurred, or `false` when a role with
    /// the same id already existed and no insertion occurred.
    async fn insert_role(&mut self, role: Role) -> Result<bool, Self::Error>;

    /// Get a role.
    async fn get_role(&self, id: RoleId) -> Result<Option<Role>, Self::Error>;

    /// Get all roles.
    async fn list_roles(&self) -> Result<Vec<Role>, Self::Error>;

    /// Delete a role.
    ///
    /// Returns `true` when the removal occurred and `false` when the role
    /// was not found in the store.
    async fn delete_role(&mut self, id: RoleId) -> Result<bool, Self::Error>;
}

/// Interface for storing, updating and querying software records.
///
/// Two variants of the trait are provided: one which is thread-safe
/// (implementing `Sync`) and one which is purely intended for
/// single-threaded execution contexts.
#[trait_variant::make(SoftwareStore: Send)]
pub trait LocalSoftwareStore: Clone {
    type Error: Display + Debug;

    /// Insert a software record.
    ///
    /// Returns `true` when the insert occurred, or `false` when a record
    /// with the same id already existed and no insertion occurred.
    async fn insert_software(&mut self, software: Software) -> Result<bool, Self::Error>;

    /// Get a software record.
    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error>;

    /// Get all software records.
    async fn list_software(&self) -> Result<Vec<Software>, Self::Error>;

    /// Apply a partial update to a software record. Only fields present in
    /// the patch are touched.
    ///
    /// Returns the updated record, or `None` when the id was not found in
    /// the store.
    async fn update_software(
        &mut self,
        id: SoftwareId,
        patch: &SoftwarePatch,
    ) -> Result<Option<Software>, Self::Error>;

    /// Delete a software record.
    ///
    /// Returns `true` when the removal occurred and `false` when the record
    /// was not found in the store.
    async fn delete_software(&mut self, id: SoftwareId) -> Result<bool, Self::Error>;
}

/// Interface for the software↔role association relation.
///
/// The relation holds each `(software_id, role_id)` pair at most once.
///
/// Two variants of the trait are provided: one which is thread-safe
/// (implementing `Sync`) and one which is purely intended for
/// single-threaded execution contexts.
#[trait_variant::make(AssociationStore: Send)]
pub trait LocalAssociationStore: Clone {
    type Error: Display + Debug;

    /// Attach a role to a software record.
    ///
    /// Attachment is idempotent: returns `true` when the pair was inserted
    /// and `false` when it was already present and nothing changed.
    async fn attach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error>;

    /// Detach a role from a software record.
    ///
    /// Returns `true` when the pair was removed and `false` when it was not
    /// present. Detaching an absent pair is not an error.
    async fn detach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error>;

    /// Get the ids of all roles attached to a software record.
    async fn role_ids_for(
        &self,
        software_id: SoftwareId,
    ) -> Result<BTreeSet<RoleId>, Self::Error>;

    /// Detach all roles from a software record, returning the number of
    /// pairs removed.
    async fn detach_all(&mut self, software_id: SoftwareId) -> Result<usize, Self::Error>;
}
