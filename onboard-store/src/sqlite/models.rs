// SPDX-License-Identifier: MIT OR Apache-2.0

use std::str::FromStr;

use onboard_core::{Role, RoleId, Software, SoftwareId};
use sqlx::FromRow;

/// A struct representing a single role row as it is stored in the database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    id: String,
    name: String,
    label: String,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            // We assume database values are valid and therefore we're safe to unwrap.
            id: RoleId::from_str(&row.id).unwrap(),
            name: row.name,
            label: row.label,
        }
    }
}

/// A struct representing a single software row as it is stored in the
/// database.
#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct SoftwareRow {
    id: String,
    name: String,
    description: Option<String>,
    url: Option<String>,
    is_active: bool,
}

impl From<SoftwareRow> for Software {
    fn from(row: SoftwareRow) -> Self {
        Software {
            // We assume database values are valid and therefore we're safe to unwrap.
            id: SoftwareId::from_str(&row.id).unwrap(),
            name: row.name,
            description: row.description,
            url: row.url,
            is_active: row.is_active,
        }
    }
}
