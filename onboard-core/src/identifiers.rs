// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque identifiers for roles and software artifacts.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

/// Identifier of a software artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoftwareId(Uuid);

impl RoleId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl SoftwareId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for RoleId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<RoleId> for Uuid {
    fn from(value: RoleId) -> Self {
        value.0
    }
}

impl From<Uuid> for SoftwareId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<SoftwareId> for Uuid {
    fn from(value: SoftwareId) -> Self {
        value.0
    }
}

impl FromStr for RoleId {
    type Err = IdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(value)?))
    }
}

impl FromStr for SoftwareId {
    type Err = IdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(value)?))
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SoftwareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors which can occur when parsing identifiers from strings.
#[derive(Debug, Error)]
pub enum IdError {
    #[error("invalid identifier encoding")]
    InvalidEncoding(#[from] uuid::Error),
}
