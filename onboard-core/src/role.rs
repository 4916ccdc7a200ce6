// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::RoleId;

/// A role which can be required by software artifacts.
///
/// Roles are referenced by the reconciliation engine but never owned by it;
/// their lifecycle is managed independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    /// Unique machine name, for example "backend-developer".
    pub name: String,
    /// Human-readable label, for example "Backend Developer".
    pub label: String,
}

impl Role {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: RoleId::random(),
            name: name.into(),
            label: label.into(),
        }
    }
}
