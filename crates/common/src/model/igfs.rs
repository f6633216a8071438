use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{ClusterId, IgfsId, SpaceId};

/// Document keys owned by the typed fields. A setting under one of these
///  would be written twice when the settings are flattened.
pub const RESERVED_KEYS: [&str; 4] = ["_id", "name", "space", "clusters"];

/// A stored IGFS configuration.
///
/// `clusters` is the back side of the cluster/IGFS relationship. Every
///  configuration attribute the core does not interpret lives in
///  `settings` and is flattened into the document on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Igfs {
    #[serde(rename = "_id")]
    pub id: IgfsId,
    pub name: String,
    pub space: SpaceId,
    #[serde(default)]
    pub clusters: Vec<ClusterId>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// Body of a save request: an IGFS document with an optional id.
///
/// A payload without `_id` creates a new IGFS; with `_id` it replaces
///  (or upserts) the IGFS with that id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IgfsPayload {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IgfsId>,
    pub name: String,
    pub space: SpaceId,
    #[serde(default)]
    pub clusters: Vec<ClusterId>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl IgfsPayload {
    pub fn new(name: impl Into<String>, space: SpaceId) -> Self {
        Self {
            id: None,
            name: name.into(),
            space,
            clusters: Vec::new(),
            settings: Map::new(),
        }
    }

    pub fn with_id(mut self, id: IgfsId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_clusters(mut self, clusters: impl IntoIterator<Item = ClusterId>) -> Self {
        self.clusters = clusters.into_iter().collect();
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Remove settings that collide with the typed fields and return
    ///  their keys
    pub fn strip_reserved_settings(&mut self) -> Vec<String> {
        let mut stripped = Vec::new();
        for key in RESERVED_KEYS {
            if self.settings.remove(key).is_some() {
                stripped.push(key.to_string());
            }
        }
        stripped
    }

    /// Drop repeated cluster ids, keeping the first occurrence of each
    pub fn dedup_clusters(&mut self) {
        let mut seen = Vec::with_capacity(self.clusters.len());
        self.clusters.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
    }

    /// Materialize the stored document under `id`
    pub fn into_igfs(self, id: IgfsId) -> Igfs {
        Igfs {
            id,
            name: self.name,
            space: self.space,
            clusters: self.clusters,
            settings: self.settings,
        }
    }
}

impl From<Igfs> for IgfsPayload {
    fn from(igfs: Igfs) -> Self {
        Self {
            id: Some(igfs.id),
            name: igfs.name,
            space: igfs.space,
            clusters: igfs.clusters,
            settings: igfs.settings,
        }
    }
}
