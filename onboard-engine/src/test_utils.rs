// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for engine tests.
use std::collections::BTreeSet;

use onboard_core::{Role, RoleId, Software, SoftwareId, SoftwarePatch};
use onboard_store::{AssociationStore, MemoryStore, RoleStore, SoftwareStore};

pub async fn store_with_roles(count: usize) -> (MemoryStore, Vec<Role>) {
    let mut store = MemoryStore::new();
    let mut roles = Vec::new();
    for index in 0..count {
        let role = Role::new(format!("role-{index}"), format!("Role {index}"));
        store.insert_role(role.clone()).await.expect("no errors");
        roles.push(role);
    }
    (store, roles)
}

/// Store double whose detach fails for designated role ids, for exercising
/// the best-effort removal pass.
#[derive(Clone)]
pub struct FailingDetach {
    inner: MemoryStore,
    failing: Option<RoleId>,
}

impl FailingDetach {
    /// Fail detaching one specific role id.
    pub fn for_role(inner: MemoryStore, role_id: RoleId) -> Self {
        Self {
            inner,
            failing: Some(role_id),
        }
    }

    /// Fail every detach.
    pub fn all(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: None,
        }
    }

    fn fails_for(&self, role_id: RoleId) -> bool {
        self.failing.is_none_or(|id| id == role_id)
    }
}

impl RoleStore for FailingDetach {
    type Error = String;

    async fn insert_role(&mut self, role: Role) -> Result<bool, Self::Error> {
        self.inner
            .insert_role(role)
            .await
            .map_err(|err| err.to_string())
    }

    async fn get_role(&self, id: RoleId) -> Result<Option<Role>, Self::Error> {
        self.inner.get_role(id).await.map_err(|err| err.to_string())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, Self::Error> {
        self.inner.list_roles().await.map_err(|err| err.to_string())
    }

    async fn delete_role(&mut self, id: RoleId) -> Result<bool, Self::Error> {
        self.inner
            .delete_role(id)
            .await
            .map_err(|err| err.to_string())
    }
}

impl SoftwareStore for FailingDetach {
    type Error = String;

    async fn insert_software(&mut self, software: Software) -> Result<bool, Self::Error> {
        self.inner
            .insert_software(software)
            .await
            .map_err(|err| err.to_string())
    }

    async fn get_software(&self, id: SoftwareId) -> Result<Option<Software>, Self::Error> {
        self.inner
            .get_software(id)
            .await
            .map_err(|err| err.to_string())
    }

    async fn list_software(&self) -> Result<Vec<Software>, Self::Error> {
        self.inner
            .list_software()
            .await
            .map_err(|err| err.to_string())
    }

    async fn update_software(
        &mut self,
        id: SoftwareId,
        patch: &SoftwarePatch,
    ) -> Result<Option<Software>, Self::Error> {
        self.inner
            .update_software(id, patch)
            .await
            .map_err(|err| err.to_string())
    }

    async fn delete_software(&mut self, id: SoftwareId) -> Result<bool, Self::Error> {
        self.inner
            .delete_software(id)
            .await
            .map_err(|err| err.to_string())
    }
}

impl AssociationStore for FailingDetach {
    type Error = String;

    async fn attach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        self.inner
            .attach(software_id, role_id)
            .await
            .map_err(|err| err.to_string())
    }

    async fn detach(
        &mut self,
        software_id: SoftwareId,
        role_id: RoleId,
    ) -> Result<bool, Self::Error> {
        if self.fails_for(role_id) {
            return Err("connection reset".to_string());
        }
        self.inner
            .detach(software_id, role_id)
            .await
            .map_err(|err| err.to_string())
    }

    async fn role_ids_for(
        &self,
        software_id: SoftwareId,
    ) -> Result<BTreeSet<RoleId>, Self::Error> {
        self.inner
            .role_ids_for(software_id)
            .await
            .map_err(|err| err.to_string())
    }

    async fn detach_all(&mut self, software_id: SoftwareId) -> Result<usize, Self::Error> {
        self.inner
            .detach_all(software_id)
            .await
            .map_err(|err| err.to_string())
    }
}
