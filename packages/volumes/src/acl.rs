//! Ownership assignment for volumes.

use serde::{Deserialize, Serialize};

/// Query selector that addresses the ACL of a path.
pub const ACL_QUERY: &str = "acl";

/// Kind of principal an [`Ownership`] names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipKind {
    User,
    Group,
}

/// A named principal: `{"name": .., "type": "user" | "group"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ownership {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OwnershipKind,
}

impl Ownership {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OwnershipKind::User,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OwnershipKind::Group,
        }
    }
}

/// Body of an ACL update request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AclRequest {
    pub authoritative: String,
    pub action: String,
    pub owner: Ownership,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Ownership>,
}

impl AclRequest {
    /// An `update` that sets the owner to `user` and, when `group` is
    /// non-empty, the group to `group`.
    pub fn update(user: &str, group: &str) -> Self {
        Self {
            authoritative: "acl".to_string(),
            action: "update".to_string(),
            owner: Ownership::user(user),
            group: (!group.is_empty()).then(|| Ownership::group(group)),
        }
    }
}
