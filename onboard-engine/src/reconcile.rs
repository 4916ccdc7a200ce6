// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure computation of the delta between a current and desired role set.
use std::collections::BTreeSet;

use onboard_core::RoleId;

/// The minimal set of changes which brings a software artifact's role set
/// from its current state to the desired state.
///
/// The two sets are disjoint by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    to_add: BTreeSet<RoleId>,
    to_remove: BTreeSet<RoleId>,
}

impl ReconciliationPlan {
    /// Role ids to be attached.
    pub fn to_add(&self) -> &BTreeSet<RoleId> {
        &self.to_add
    }

    /// Role ids to be detached.
    pub fn to_remove(&self) -> &BTreeSet<RoleId> {
        &self.to_remove
    }

    pub fn add_count(&self) -> usize {
        self.to_add.len()
    }

    pub fn remove_count(&self) -> usize {
        self.to_remove.len()
    }

    /// Returns `true` when applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the reconciliation plan between the current and desired role-id
/// sets.
///
/// `to_add = desired − current` and `to_remove = current − desired`. Pure
/// set difference with no side effects; the same inputs always yield the
/// same plan.
pub fn reconcile(current: &BTreeSet<RoleId>, desired: &BTreeSet<RoleId>) -> ReconciliationPlan {
    ReconciliationPlan {
        to_add: desired.difference(current).copied().collect(),
        to_remove: current.difference(desired).copied().collect(),
    }
}
