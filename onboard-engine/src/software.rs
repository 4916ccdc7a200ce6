// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing software operations: CRUD over software records with the
//! required-role set kept reconciled on every write.
use std::collections::BTreeSet;

use onboard_core::{NewSoftware, Role, RoleId, Software, SoftwareId, SoftwarePatch};
use onboard_store::{AssociationStore, RoleStore, SoftwareStore};
use tracing::debug;

use crate::apply::{ApplyReport, apply_plan, store_error, validate_roles_exist};
use crate::error::EngineError;
use crate::reconcile::reconcile;

/// A software record together with its resolved required roles, in role-id
/// order. The response view callers build their output from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftwareView {
    pub software: Software,
    pub roles: Vec<Role>,
}

/// Create a software record and attach its required roles.
///
/// A software record must require at least one role at creation time; an
/// empty desired set is rejected with [`EngineError::NoRolesProvided`]. The
/// desired roles are validated before the record is inserted, so a bad role
/// id leaves no orphan record behind.
pub async fn create_software<S>(
    store: &mut S,
    new_software: NewSoftware,
    desired_role_ids: &BTreeSet<RoleId>,
) -> Result<SoftwareView, EngineError>
where
    S: SoftwareStore + RoleStore + AssociationStore + Send + Sync,
{
    if desired_role_ids.is_empty() {
        return Err(EngineError::NoRolesProvided);
    }

    let missing = validate_roles_exist(store, desired_role_ids).await?;
    if let Some(&role_id) = missing.first() {
        return Err(EngineError::RoleNotFound(role_id));
    }

    let software: Software = new_software.into();
    debug!(
        "creating software {} ({}) with {} required roles",
        software.id,
        software.name,
        desired_role_ids.len()
    );
    store
        .insert_software(software.clone())
        .await
        .map_err(store_error)?;

    let plan = reconcile(&BTreeSet::new(), desired_role_ids);
    let report = apply_plan(store, software.id, &plan).await?;

    Ok(SoftwareView {
        software,
        roles: report.added_roles,
    })
}

/// Update a software record and reconcile its required-role set.
///
/// The current role-id set is read once at the start; the record fields are
/// patched, then exactly the attachments and detachments needed to reach
/// `desired_role_ids` are applied. An empty desired set performs full
/// detachment without error.
///
/// Returns the updated view together with the [`ApplyReport`]: removals run
/// best-effort, so the caller inspects the report to decide whether a
/// partially reconciled result (some detachments failed) is acceptable or
/// must be surfaced as an error.
pub async fn update_software<S>(
    store: &mut S,
    id: SoftwareId,
    patch: &SoftwarePatch,
    desired_role_ids: &BTreeSet<RoleId>,
) -> Result<(SoftwareView, ApplyReport), EngineError>
where
    S: SoftwareStore + RoleStore + AssociationStore + Send + Sync,
{
    let current_role_ids = store.role_ids_for(id).await.map_err(store_error)?;

    let software = store
        .update_software(id, patch)
        .await
        .map_err(store_error)?
        .ok_or(EngineError::SoftwareNotFound(id))?;

    let plan = reconcile(&current_role_ids, desired_role_ids);
    debug!(
        "updating software {id}: {} roles to add, {} to remove",
        plan.add_count(),
        plan.remove_count()
    );
    let report = apply_plan(store, id, &plan).await?;

    let final_role_ids = store.role_ids_for(id).await.map_err(store_error)?;
    let roles = resolve_roles(store, &final_role_ids).await?;

    Ok((SoftwareView { software, roles }, report))
}

/// Get one software record with its resolved roles.
pub async fn get_software<S>(store: &S, id: SoftwareId) -> Result<SoftwareView, EngineError>
where
    S: SoftwareStore + RoleStore + AssociationStore + Sync,
{
    let software = store
        .get_software(id)
        .await
        .map_err(store_error)?
        .ok_or(EngineError::SoftwareNotFound(id))?;

    let role_ids = store.role_ids_for(id).await.map_err(store_error)?;
    let roles = resolve_roles(store, &role_ids).await?;

    Ok(SoftwareView { software, roles })
}

/// Get all software records with their resolved roles.
pub async fn list_software<S>(store: &S) -> Result<Vec<SoftwareView>, EngineError>
where
    S: SoftwareStore + RoleStore + AssociationStore + Sync,
{
    let mut views = Vec::new();
    for software in store.list_software().await.map_err(store_error)? {
        let role_ids = store.role_ids_for(software.id).await.map_err(store_error)?;
        let roles = resolve_roles(store, &role_ids).await?;
        views.push(SoftwareView { software, roles });
    }
    Ok(views)
}

/// Delete a software record, detaching all of its role pairs first so no
/// dangling association survives the record.
pub async fn delete_software<S>(store: &mut S, id: SoftwareId) -> Result<(), EngineError>
where
    S: SoftwareStore + AssociationStore + Send + Sync,
{
    let detached = store.detach_all(id).await.map_err(store_error)?;

    let deleted = store.delete_software(id).await.map_err(store_error)?;
    if !deleted {
        return Err(EngineError::SoftwareNotFound(id));
    }

    debug!("deleted software {id} and {detached} role pairs");
    Ok(())
}

async fn resolve_roles<S>(store: &S, role_ids: &BTreeSet<RoleId>) -> Result<Vec<Role>, EngineError>
where
    S: RoleStore + Sync,
{
    let mut roles = Vec::with_capacity(role_ids.len());
    for &role_id in role_ids {
        // A pair may point at a role record deleted since attachment; stale
        // pairs are tolerated and simply left out of the view.
        if let Some(role) = store.get_role(role_id).await.map_err(store_error)? {
            roles.push(role);
        }
    }
    Ok(roles)
}
