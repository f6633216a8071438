use serde::{Deserialize, Serialize};

use super::ids::{ClusterId, IgfsId, SpaceId};

/// A cluster and the IGFS configurations attached to it.
///
/// `igfss` is the forward side of the cluster/IGFS relationship and is
///  treated as an ordered set: members are appended once and never
///  duplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    #[serde(rename = "_id")]
    pub id: ClusterId,
    pub name: String,
    pub space: SpaceId,
    #[serde(default)]
    pub igfss: Vec<IgfsId>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, space: SpaceId) -> Self {
        Self {
            id: ClusterId::new(),
            name: name.into(),
            space,
            igfss: Vec::new(),
        }
    }

    /// Add `igfs` to the membership set, returning whether it changed
    pub fn add_igfs(&mut self, igfs: IgfsId) -> bool {
        if self.igfss.contains(&igfs) {
            return false;
        }
        self.igfss.push(igfs);
        true
    }

    /// Remove `igfs` from the membership set, returning whether it changed
    pub fn pull_igfs(&mut self, igfs: IgfsId) -> bool {
        let before = self.igfss.len();
        self.igfss.retain(|id| *id != igfs);
        before != self.igfss.len()
    }
}

/// Id and name projection of a cluster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterRef {
    #[serde(rename = "_id")]
    pub id: ClusterId,
    pub name: String,
}

impl From<&Cluster> for ClusterRef {
    fn from(cluster: &Cluster) -> Self {
        Self {
            id: cluster.id,
            name: cluster.name.clone(),
        }
    }
}

/// Cluster presented as a selectable option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterOption {
    pub value: ClusterId,
    pub label: String,
}

impl From<ClusterRef> for ClusterOption {
    fn from(cluster: ClusterRef) -> Self {
        Self {
            value: cluster.id,
            label: cluster.name,
        }
    }
}
