// SPDX-License-Identifier: MIT OR Apache-2.0

//! Side-effecting application of a reconciliation plan against the stores.
use std::collections::BTreeSet;
use std::fmt::Display;

use onboard_core::{Role, RoleId, SoftwareId};
use onboard_store::{AssociationStore, RoleStore};
use tracing::{debug, warn};

use crate::error::{AssociationOp, EngineError};
use crate::reconcile::ReconciliationPlan;

/// A detachment which failed and was skipped by the best-effort removal
/// pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovalFailure {
    pub role_id: RoleId,
    pub reason: String,
}

impl RemovalFailure {
    /// Convert into the domain error, for callers which decide a partially
    /// reconciled result must be surfaced as a failure after all.
    pub fn into_error(self) -> EngineError {
        EngineError::AssociationWriteFailed {
            role_id: self.role_id,
            operation: AssociationOp::Detach,
            reason: self.reason,
        }
    }
}

/// Outcome of applying a reconciliation plan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of pairs actually detached.
    pub removed: usize,
    /// Number of pairs actually attached. Idempotent re-attachments of
    /// already-present pairs are not counted.
    pub added: usize,
    /// The resolved role entities for the added set, in role-id order, for
    /// the caller to build a response view from.
    pub added_roles: Vec<Role>,
    /// Detachments which failed during the best-effort removal pass.
    pub removal_failures: Vec<RemovalFailure>,
}

impl ApplyReport {
    /// Returns `true` when the plan was applied without any removal
    /// failure. The caller decides whether a partially reconciled result is
    /// acceptable or must be surfaced as an error.
    pub fn fully_reconciled(&self) -> bool {
        self.removal_failures.is_empty()
    }
}

pub(crate) fn store_error(err: impl Display) -> EngineError {
    EngineError::Store(err.to_string())
}

/// Return the subset of the given role ids with no corresponding role
/// entity in the store.
pub async fn validate_roles_exist<S>(
    store: &S,
    role_ids: &BTreeSet<RoleId>,
) -> Result<BTreeSet<RoleId>, EngineError>
where
    S: RoleStore + Sync,
{
    let (_, missing) = resolve_role_set(store, role_ids).await?;
    Ok(missing)
}

/// Resolve a role-id set in a single pass over the store, splitting it into
/// the found entities (in role-id order) and the missing ids.
async fn resolve_role_set<S>(
    store: &S,
    role_ids: &BTreeSet<RoleId>,
) -> Result<(Vec<Role>, BTreeSet<RoleId>), EngineError>
where
    S: RoleStore + Sync,
{
    let mut roles = Vec::with_capacity(role_ids.len());
    let mut missing = BTreeSet::new();
    for &role_id in role_ids {
        match store.get_role(role_id).await.map_err(store_error)? {
            Some(role) => roles.push(role),
            None => {
                missing.insert(role_id);
            }
        }
    }
    Ok((roles, missing))
}

/// Apply a reconciliation plan to the association state of one software
/// record.
///
/// Detachments run first and are best-effort: each pair is attempted
/// independently, failures are collected into the report. Attachments are
/// validated fail-fast: once any role id in the add set is unknown, the
/// whole add phase is aborted before a single pair is attached. Attaching an
/// already-present pair is a no-op, which makes re-applying the same plan
/// safe.
pub async fn apply_plan<S>(
    store: &mut S,
    software_id: SoftwareId,
    plan: &ReconciliationPlan,
) -> Result<ApplyReport, EngineError>
where
    S: RoleStore + AssociationStore + Send + Sync,
{
    debug!(
        "applying plan for software {software_id}: {} to add, {} to remove",
        plan.add_count(),
        plan.remove_count()
    );

    let mut report = ApplyReport::default();

    // Stale pairs are tolerated silently: a detach which finds nothing is
    // not a failure.
    for &role_id in plan.to_remove() {
        match store.detach(software_id, role_id).await {
            Ok(true) => report.removed += 1,
            Ok(false) => (),
            Err(err) => {
                warn!("detach failed for role {role_id} on software {software_id}: {err}");
                report.removal_failures.push(RemovalFailure {
                    role_id,
                    reason: err.to_string(),
                });
            }
        }
    }

    // One store lookup per id: the resolved entities double as both the
    // existence validation and the role list for the report.
    let (resolved, missing) = resolve_role_set(store, plan.to_add()).await?;
    if let Some(&role_id) = missing.first() {
        return Err(EngineError::RoleNotFound(role_id));
    }

    for role in &resolved {
        let attached = store
            .attach(software_id, role.id)
            .await
            .map_err(|err| EngineError::AssociationWriteFailed {
                role_id: role.id,
                operation: AssociationOp::Attach,
                reason: err.to_string(),
            })?;
        if attached {
            report.added += 1;
        }
    }
    report.added_roles = resolved;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use onboard_core::{NewSoftware, Role, RoleId, Software, SoftwareId};
    use onboard_store::{AssociationStore, MemoryStore, RoleStore};

    use crate::error::{AssociationOp, EngineError};
    use crate::reconcile::reconcile;
    use crate::test_utils::{FailingDetach, store_with_roles};

    use super::{apply_plan, validate_roles_exist};

    #[tokio::test]
    async fn applies_additions_and_removals() {
        let (mut store, roles) = store_with_roles(3).await;
        let software: Software = NewSoftware::new("Figma").into();

        store.attach(software.id, roles[0].id).await.expect("no errors");
        store.attach(software.id, roles[1].id).await.expect("no errors");

        let current = store.role_ids_for(software.id).await.expect("no errors");
        let desired = BTreeSet::from([roles[1].id, roles[2].id]);

        let plan = reconcile(&current, &desired);
        let report = apply_plan(&mut store, software.id, &plan)
            .await
            .expect("plan applies");

        assert_eq!(report.removed, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.added_roles, vec![roles[2].clone()]);
        assert!(report.fully_reconciled());

        let after = store.role_ids_for(software.id).await.expect("no errors");
        assert_eq!(after, desired);
    }

    #[tokio::test]
    async fn reapplying_a_plan_is_idempotent() {
        let (mut store, roles) = store_with_roles(2).await;
        let software: Software = NewSoftware::new("Slack").into();

        let desired: BTreeSet<RoleId> = roles.iter().map(|role| role.id).collect();
        let plan = reconcile(&BTreeSet::new(), &desired);

        apply_plan(&mut store, software.id, &plan)
            .await
            .expect("plan applies");
        let report = apply_plan(&mut store, software.id, &plan)
            .await
            .expect("plan applies again");

        // The second pass attaches nothing new but still resolves the roles.
        assert_eq!(report.added, 0);
        assert_eq!(report.added_roles.len(), 2);

        let after = store.role_ids_for(software.id).await.expect("no errors");
        assert_eq!(after, desired);
    }

    #[tokio::test]
    async fn unknown_role_aborts_before_any_attachment() {
        let (mut store, roles) = store_with_roles(1).await;
        let software: Software = NewSoftware::new("Jira").into();
        let unknown = RoleId::random();

        let desired = BTreeSet::from([roles[0].id, unknown]);
        let plan = reconcile(&BTreeSet::new(), &desired);

        let result = apply_plan(&mut store, software.id, &plan).await;
        match result {
            Err(EngineError::RoleNotFound(role_id)) => assert_eq!(role_id, unknown),
            other => panic!("expected RoleNotFound, got {other:?}"),
        }

        // Not even the valid id in the same batch was attached.
        let after = store.role_ids_for(software.id).await.expect("no errors");
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn validate_reports_the_missing_subset() {
        let (store, roles) = store_with_roles(2).await;
        let unknown_a = RoleId::random();
        let unknown_b = RoleId::random();

        let requested = BTreeSet::from([roles[0].id, unknown_a, roles[1].id, unknown_b]);
        let missing = validate_roles_exist(&store, &requested)
            .await
            .expect("no errors");

        assert_eq!(missing, BTreeSet::from([unknown_a, unknown_b]));
    }

    #[tokio::test]
    async fn removals_are_not_validated_against_existence() {
        let (mut store, roles) = store_with_roles(1).await;
        let software: Software = NewSoftware::new("Zoom").into();

        // A stale pair pointing at a role record which no longer exists.
        let stale = RoleId::random();
        store.attach(software.id, stale).await.expect("no errors");
        store.attach(software.id, roles[0].id).await.expect("no errors");

        let current = store.role_ids_for(software.id).await.expect("no errors");
        let desired = BTreeSet::from([roles[0].id]);

        let report = apply_plan(&mut store, software.id, &reconcile(&current, &desired))
            .await
            .expect("plan applies");

        assert_eq!(report.removed, 1);
        assert!(report.fully_reconciled());
    }

    #[tokio::test]
    async fn removal_failures_are_isolated_per_pair() {
        let (inner, roles) = store_with_roles(3).await;
        let software: Software = NewSoftware::new("GitHub").into();

        let mut store = FailingDetach::for_role(inner, roles[0].id);
        for role in &roles[..2] {
            store.attach(software.id, role.id).await.expect("no errors");
        }

        let current = BTreeSet::from([roles[0].id, roles[1].id]);
        let desired = BTreeSet::from([roles[2].id]);

        let report = apply_plan(&mut store, software.id, &reconcile(&current, &desired))
            .await
            .expect("apply succeeds with partial removal failure");

        // The failing pair is reported, the other removal and the add phase
        // still ran.
        assert_eq!(report.removal_failures.len(), 1);
        assert_eq!(report.removal_failures[0].role_id, roles[0].id);
        assert_eq!(report.removed, 1);
        assert_eq!(report.added, 1);
        assert!(!report.fully_reconciled());

        let after = store.role_ids_for(software.id).await.expect("no errors");
        assert_eq!(after, BTreeSet::from([roles[0].id, roles[2].id]));
    }

    #[tokio::test]
    async fn removal_failure_converts_to_domain_error() {
        let (inner, roles) = store_with_roles(1).await;
        let software: Software = NewSoftware::new("Drive").into();

        let mut store = FailingDetach::all(inner);
        store.attach(software.id, roles[0].id).await.expect("no errors");

        let current = BTreeSet::from([roles[0].id]);
        let report = apply_plan(&mut store, software.id, &reconcile(&current, &BTreeSet::new()))
            .await
            .expect("apply succeeds with removal failure");

        let err = report.removal_failures[0].clone().into_error();
        match err {
            EngineError::AssociationWriteFailed {
                role_id,
                operation,
                ..
            } => {
                assert_eq!(role_id, roles[0].id);
                assert_eq!(operation, AssociationOp::Detach);
            }
            other => panic!("expected AssociationWriteFailed, got {other:?}"),
        }
    }

    /// Store double counting role lookups, for checking the add phase hits
    /// the role store once per id.
    #[derive(Clone)]
    struct CountingRoles {
        inner: MemoryStore,
        lookups: Arc<AtomicUsize>,
    }

    impl RoleStore for CountingRoles {
        type Error = String;

        async fn insert_role(&mut self, role: Role) -> Result<bool, Self::Error> {
            self.inner.insert_role(role).await.map_err(|err| err.to_string())
        }

        async fn get_role(&self, id: RoleId) -> Result<Option<Role>, Self::Error> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.get_role(id).await.map_err(|err| err.to_string())
        }

        async fn list_roles(&self) -> Result<Vec<Role>, Self::Error> {
            self.inner.list_roles().await.map_err(|err| err.to_string())
        }

        async fn delete_role(&mut self, id: RoleId) -> Result<bool, Self::Error> {
            self.inner.delete_role(id).await.map_err(|err| err.to_string())
        }
    }

    impl AssociationStore for CountingRoles {
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

    #[tokio::test]
    async fn add_phase_resolves_each_role_once() {
        let (inner, roles) = store_with_roles(3).await;
        let software: Software = NewSoftware::new("Confluence").into();

        let mut store = CountingRoles {
            inner,
            lookups: Arc::new(AtomicUsize::new(0)),
        };

        let desired: BTreeSet<RoleId> = roles.iter().map(|role| role.id).collect();
        let plan = reconcile(&BTreeSet::new(), &desired);

        let report = apply_plan(&mut store, software.id, &plan)
            .await
            .expect("plan applies");

        assert_eq!(report.added_roles.len(), 3);
        assert_eq!(store.lookups.load(Ordering::Relaxed), 3);
    }
}
