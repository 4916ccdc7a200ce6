// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::SoftwareId;

/// A software artifact handed out during onboarding.
///
/// The set of roles required to receive the software is not stored on the
/// record itself but in the association store, keyed by `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub id: SoftwareId,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub is_active: bool,
}

/// Payload for creating a new software record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSoftware {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl NewSoftware {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            url: None,
            is_active: true,
        }
    }
}

impl From<NewSoftware> for Software {
    fn from(value: NewSoftware) -> Self {
        Self {
            id: SoftwareId::random(),
            name: value.name,
            description: value.description,
            url: value.url,
            is_active: value.is_active,
        }
    }
}

/// Partial update of a software record.
///
/// Each field is applied only when present; absent fields leave the record
/// untouched. The required-role set is deliberately not part of the patch, it
/// is passed separately to the engine's update operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwarePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SoftwarePatch {
    /// Returns `true` when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.url.is_none()
            && self.is_active.is_none()
    }

    /// Apply all present fields to the given record.
    pub fn apply_to(&self, software: &mut Software) {
        if let Some(name) = &self.name {
            software.name = name.clone();
        }
        if let Some(description) = &self.description {
            software.description = Some(description.clone());
        }
        if let Some(url) = &self.url {
            software.url = Some(url.clone());
        }
        if let Some(is_active) = self.is_active {
            software.is_active = is_active;
        }
    }
}
