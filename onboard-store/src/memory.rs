// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence for roles, software records and associations.
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use onboard_core::{Role, RoleId, Software, SoftwareId, SoftwarePatch};

use crate::{AssociationStore, RoleStore, SoftwareStore};

/// An in-memory store for onboard domain state.
#[derive(Clone, Debug, Default)]
pub struct InnerMemoryStore {
    roles: HashMap<RoleId, Role>,
    software: HashMap<SoftwareId, Software>,
    assignments: HashMap<SoftwareId, BTreeSet<RoleId>>,
}

/// An in-memory store implementing all three store interfaces.
///
/// `MemoryStore` supports usage in asynchronous and multi-threaded contexts
/// by wrapping an `InnerMemoryStore` with an `RwLock` and `Arc`. Convenience
/// methods are provided to obtain a read- or write-lock on the underlying
/// store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<InnerMemoryStore>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain a read-lock on the store.
    pub fn read_store(&self) -> RwLockReadGuard<'_, InnerMemoryStore> {
        self.inner
            .read()
            .expect("acquire shared read access on store")
    }

    /// Obtain a write-lock on the store.
    pub fn write_store(&self) -> RwLockWriteGuard<'_, InnerMemoryStore> {
        self.inner
            .write()
            .expect("acquire exclusive write access on store")
    }
}

impl RoleStore for MemoryStore {
    type Error = Infallible;

    async fn insert_role(&mut self, role: Role) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store.roles.contains_key(&role.id) {
            return Ok(false);
        }
        store.roles.insert(role.id, role);
        Ok(true)
    }

    async fn get_role(&self, id: RoleId) -> Result<Option<Role>, Self::Error> {
        Ok(self.read_store().roles.get(&id).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, Self::Error> {
        let mut roles: Vec<Role> = self.read_store().roles.values().cloned().collect();
        roles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(roles)
    }

    async fn delete_role(&mut self, id: RoleId) -> Result<bool, Self::Error> {
        Ok(self.write_store().roles.remove(&id).is_some())
    }
}

impl SoftwareStore for MemoryStore {
    type Error = Infallible;

    async fn insert_software(&mut self, software: Software) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        if store.software.contains_key(&software.id) {
            return Ok(false);
        }
        store.software.insert(software.id, software);
        Ok(true)
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        Ok(self.read_store().software.get(&id).cloned())
    }

    async fn list_software(&self) -> Result<Vec<Software>, Self::Error> {
        let mut software: Vec<Software> = self.read_store().software.values().cloned().collect();
        software.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(software)
    }

    async fn update_software(
        &mut self,
        id: SoftwareId,
        patch: &SoftwarePatch,
    ) -> Result<Option<Software>, Self::Error> {
        let mut store = self.write_store();
        let Some(software) = store.software.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(software);
        Ok(Some(software.clone()))
    }

    async fn delete_software(&mut self, id: SoftwareId) -> Result<bool, Self::Error> {
        Ok(self.write_store().software.remove(&id).is_some())
    }
}

impl AssociationStore for MemoryStore {
    type Error = Infallible;

    async fn attach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        let inserted = self
            .write_store()
            .assignments
            .entry(software_id)
            .or_default()
            .insert(role_id);
        Ok(inserted)
    }

    async fn detach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        let mut store = self.write_store();
        let Some(role_ids) = store.assignments.get_mut(&software_id) else {
            return Ok(false);
        };
        let removed = role_ids.remove(&role_id);
        if role_ids.is_empty() {
            store.assignments.remove(&software_id);
        }
        Ok(removed)
    }

    async fn role_ids_for(
        &self,
        software_id: SoftwareId,
    ) -> Result<BTreeSet<RoleId>, Self::Error> {
        Ok(self
            .read_store()
            .assignments
            .get(&software_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn detach_all(&mut self, software_id: SoftwareId) -> Result<usize, Self::Error> {
        let removed = self
            .write_store()
            .assignments
            .remove(&software_id)
            .map(|role_ids| role_ids.len())
            .unwrap_or(0);
        Ok(removed)
    }
}
