use serde::{Deserialize, Serialize};

use super::ids::{PrincipalId, SpaceId};

/// An account granted access to a space it does not own
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceUser {
    pub account: PrincipalId,
}

/// Tenant container that owns clusters and IGFS configurations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    #[serde(rename = "_id")]
    pub id: SpaceId,
    pub name: String,
    pub owner: PrincipalId,
    #[serde(rename = "usedBy", default)]
    pub used_by: Vec<SpaceUser>,
}

impl Space {
    pub fn new(name: impl Into<String>, owner: PrincipalId) -> Self {
        Self {
            id: SpaceId::new(),
            name: name.into(),
            owner,
            used_by: Vec::new(),
        }
    }

    /// Grant `account` access to this space
    pub fn share_with(mut self, account: PrincipalId) -> Self {
        if !self.used_by.iter().any(|u| u.account == account) {
            self.used_by.push(SpaceUser { account });
        }
        self
    }

    /// Whether `principal` owns this space or is listed in `usedBy`
    pub fn is_accessible_by(&self, principal: PrincipalId) -> bool {
        self.owner == principal || self.used_by.iter().any(|u| u.account == principal)
    }
}
