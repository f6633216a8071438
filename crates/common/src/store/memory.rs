use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{DocumentStore, StoreError};
use crate::model::{
    Cluster, ClusterId, ClusterRef, Igfs, IgfsId, IgfsPayload, PrincipalId, Space, SpaceId,
};

/// Store operations that can be made to fail on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    SpacesForPrincipal,
    ClustersInSpaces,
    IgfssInSpaces,
    FindIgfsByName,
    GetIgfs,
    GetCluster,
    UpsertIgfs,
    InsertIgfs,
    AddIgfsToClusters,
    PullIgfsFromClusters,
    RemoveIgfs,
    RemoveIgfssInSpaces,
    ResetClusterIgfss,
}

/// In-memory document store using HashMaps
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    spaces: HashMap<SpaceId, Space>,
    clusters: HashMap<ClusterId, Cluster>,
    igfss: HashMap<IgfsId, Igfs>,
    /// Operations that fail until cleared
    failing: HashSet<StoreOp>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
    #[error("injected failure for {0:?}")]
    Injected(StoreOp),
}

type MemoryResult<T> = Result<T, StoreError<MemoryStoreError>>;

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner::default())),
        }
    }

    fn read(&self, op: StoreOp) -> MemoryResult<RwLockReadGuard<'_, MemoryStoreInner>> {
        let inner = self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })?;
        if inner.failing.contains(&op) {
            return Err(StoreError::Provider(MemoryStoreError::Injected(op)));
        }
        Ok(inner)
    }

    fn write(&self, op: StoreOp) -> MemoryResult<RwLockWriteGuard<'_, MemoryStoreInner>> {
        let inner = self.write_unchecked()?;
        if inner.failing.contains(&op) {
            return Err(StoreError::Provider(MemoryStoreError::Injected(op)));
        }
        Ok(inner)
    }

    fn write_unchecked(&self) -> MemoryResult<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|e| {
            StoreError::Provider(MemoryStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }

    /* Seeding and failure injection */

    pub fn insert_space(&self, space: Space) -> MemoryResult<()> {
        self.write_unchecked()?.spaces.insert(space.id, space);
        Ok(())
    }

    pub fn insert_cluster(&self, cluster: Cluster) -> MemoryResult<()> {
        self.write_unchecked()?.clusters.insert(cluster.id, cluster);
        Ok(())
    }

    /// Delete a cluster outright, leaving any IGFS references to it dangling
    pub fn delete_cluster(&self, id: ClusterId) -> MemoryResult<bool> {
        Ok(self.write_unchecked()?.clusters.remove(&id).is_some())
    }

    /// Make every subsequent call of `op` fail until cleared
    pub fn fail(&self, op: StoreOp) -> MemoryResult<()> {
        self.write_unchecked()?.failing.insert(op);
        Ok(())
    }

    pub fn clear_failures(&self) -> MemoryResult<()> {
        self.write_unchecked()?.failing.clear();
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStoreInner {
    fn name_taken(&self, space: SpaceId, name: &str, except: Option<IgfsId>) -> bool {
        self.igfss
            .values()
            .any(|f| f.space == space && f.name == name && Some(f.id) != except)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn spaces_for_principal(&self, principal: PrincipalId) -> MemoryResult<Vec<Space>> {
        let inner = self.read(StoreOp::SpacesForPrincipal)?;
        let mut spaces: Vec<Space> = inner
            .spaces
            .values()
            .filter(|s| s.is_accessible_by(principal))
            .cloned()
            .collect();
        spaces.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(spaces)
    }

    async fn clusters_in_spaces(&self, spaces: &[SpaceId]) -> MemoryResult<Vec<ClusterRef>> {
        let inner = self.read(StoreOp::ClustersInSpaces)?;
        let mut clusters: Vec<ClusterRef> = inner
            .clusters
            .values()
            .filter(|c| spaces.contains(&c.space))
            .map(ClusterRef::from)
            .collect();
        clusters.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(clusters)
    }

    async fn igfss_in_spaces(&self, spaces: &[SpaceId]) -> MemoryResult<Vec<Igfs>> {
        let inner = self.read(StoreOp::IgfssInSpaces)?;
        let mut igfss: Vec<Igfs> = inner
            .igfss
            .values()
            .filter(|f| spaces.contains(&f.space))
            .cloned()
            .collect();
        igfss.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(igfss)
    }

    async fn find_igfs_by_name(&self, space: SpaceId, name: &str) -> MemoryResult<Option<Igfs>> {
        let inner = self.read(StoreOp::FindIgfsByName)?;
        Ok(inner
            .igfss
            .values()
            .find(|f| f.space == space && f.name == name)
            .cloned())
    }

    async fn get_igfs(&self, id: IgfsId) -> MemoryResult<Option<Igfs>> {
        let inner = self.read(StoreOp::GetIgfs)?;
        Ok(inner.igfss.get(&id).cloned())
    }

    async fn get_cluster(&self, id: ClusterId) -> MemoryResult<Option<Cluster>> {
        let inner = self.read(StoreOp::GetCluster)?;
        Ok(inner.clusters.get(&id).cloned())
    }

    async fn upsert_igfs(&self, igfs: &Igfs) -> MemoryResult<()> {
        let mut inner = self.write(StoreOp::UpsertIgfs)?;
        if inner.name_taken(igfs.space, &igfs.name, Some(igfs.id)) {
            return Err(StoreError::DuplicateName {
                space: igfs.space,
                name: igfs.name.clone(),
            });
        }
        inner.igfss.insert(igfs.id, igfs.clone());
        Ok(())
    }

    async fn insert_igfs(&self, payload: &IgfsPayload) -> MemoryResult<IgfsId> {
        let mut inner = self.write(StoreOp::InsertIgfs)?;
        if inner.name_taken(payload.space, &payload.name, None) {
            return Err(StoreError::DuplicateName {
                space: payload.space,
                name: payload.name.clone(),
            });
        }
        let id = IgfsId::new();
        inner.igfss.insert(id, payload.clone().into_igfs(id));
        Ok(id)
    }

    async fn add_igfs_to_clusters(&self, igfs: IgfsId, clusters: &[ClusterId]) -> MemoryResult<u64> {
        let mut inner = self.write(StoreOp::AddIgfsToClusters)?;
        let mut matched = 0;
        for id in clusters {
            if let Some(cluster) = inner.clusters.get_mut(id) {
                cluster.add_igfs(igfs);
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn pull_igfs_from_clusters_except(
        &self,
        igfs: IgfsId,
        keep: &[ClusterId],
    ) -> MemoryResult<u64> {
        let mut inner = self.write(StoreOp::PullIgfsFromClusters)?;
        let mut matched = 0;
        for cluster in inner.clusters.values_mut() {
            if !keep.contains(&cluster.id) && cluster.pull_igfs(igfs) {
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn remove_igfs(&self, id: IgfsId) -> MemoryResult<u64> {
        let mut inner = self.write(StoreOp::RemoveIgfs)?;
        Ok(inner.igfss.remove(&id).map_or(0, |_| 1))
    }

    async fn remove_igfss_in_spaces(&self, spaces: &[SpaceId]) -> MemoryResult<u64> {
        let mut inner = self.write(StoreOp::RemoveIgfssInSpaces)?;
        let before = inner.igfss.len();
        inner.igfss.retain(|_, f| !spaces.contains(&f.space));
        Ok((before - inner.igfss.len()) as u64)
    }

    async fn reset_cluster_igfss_in_spaces(&self, spaces: &[SpaceId]) -> MemoryResult<u64> {
        let mut inner = self.write(StoreOp::ResetClusterIgfss)?;
        let mut matched = 0;
        for cluster in inner
            .clusters
            .values_mut()
            .filter(|c| spaces.contains(&c.space))
        {
            cluster.igfss.clear();
            matched += 1;
        }
        Ok(matched)
    }
}
