//! Reference types shared by several resources.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A reference to another PagerDuty object.
///
/// PagerDuty embeds related objects as references (`escalation_policy`,
/// `vendor`, `service`, ...) carrying an ID, a `*_reference` type and a
/// summary.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiObject {
    /// The object ID.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// The object type (e.g. `escalation_policy_reference`).
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,

    /// Short human-readable summary.
    #[serde(default)]
    pub summary: Option<String>,

    /// API URL of the object.
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,

    /// Web UI URL of the object.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl ApiObject {
    /// Build a reference of the given type to `id`.
    pub fn reference(id: impl Into<String>, object_type: &str) -> Self {
        Self {
            id: id.into(),
            object_type: Some(object_type.to_string()),
            ..Default::default()
        }
    }
}

/// The escalation policy a service routes incidents through.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    #[serde(flatten)]
    pub object: ApiObject,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl EscalationPolicy {
    /// A bare `escalation_policy_reference` to `id`.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            object: ApiObject::reference(id, "escalation_policy_reference"),
            ..Default::default()
        }
    }

    /// The policy ID.
    pub fn id(&self) -> &str {
        &self.object.id
    }
}

/// A team a service belongs to.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(flatten)]
    pub object: ApiObject,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Team {
    /// A bare `team_reference` to `id`.
    pub fn reference(id: impl Into<String>) -> Self {
        Self {
            object: ApiObject::reference(id, "team_reference"),
            ..Default::default()
        }
    }

    /// The team ID.
    pub fn id(&self) -> &str {
        &self.object.id
    }
}
