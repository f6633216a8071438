use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::model::{
    Cluster, ClusterId, ClusterRef, Igfs, IgfsId, IgfsPayload, PrincipalId, Space, SpaceId,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    /// Any failure of the underlying storage engine
    #[error("unhandled document store error: {0}")]
    Provider(#[from] T),
    /// A write would give two IGFS configurations in the same space
    ///  the same name
    #[error("an IGFS named {name:?} already exists in space {space}")]
    DuplicateName { space: SpaceId, name: String },
}

/// Document storage consumed by the IGFS core.
///
/// Every method touches its records atomically on its own, but nothing
///  is atomic across calls: a caller issuing several updates must expect
///  other requests to interleave between them. All cluster membership
///  updates are set operations, so re-issuing one is always safe.
///
/// Methods returning `u64` report how many documents or references the
///  store touched; callers only use the counts for logging.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug + Clone + 'static {
    type Error: std::error::Error + Display + Debug + Send + Sync + 'static;

    /// Spaces owned by `principal` or listing it in `usedBy`
    async fn spaces_for_principal(
        &self,
        principal: PrincipalId,
    ) -> Result<Vec<Space>, StoreError<Self::Error>>;

    /// Id/name projection of the clusters in `spaces`, ordered by name
    async fn clusters_in_spaces(
        &self,
        spaces: &[SpaceId],
    ) -> Result<Vec<ClusterRef>, StoreError<Self::Error>>;

    /// IGFS configurations in `spaces`, ordered by name
    async fn igfss_in_spaces(&self, spaces: &[SpaceId])
        -> Result<Vec<Igfs>, StoreError<Self::Error>>;

    /// The IGFS called `name` in `space`, if any. Names match exactly.
    async fn find_igfs_by_name(
        &self,
        space: SpaceId,
        name: &str,
    ) -> Result<Option<Igfs>, StoreError<Self::Error>>;

    async fn get_igfs(&self, id: IgfsId) -> Result<Option<Igfs>, StoreError<Self::Error>>;

    async fn get_cluster(&self, id: ClusterId) -> Result<Option<Cluster>, StoreError<Self::Error>>;

    /// Replace the IGFS stored under `igfs.id`, creating it if missing
    ///
    /// Should fail with `StoreError::DuplicateName` when another IGFS in
    ///  the same space already uses the name.
    async fn upsert_igfs(&self, igfs: &Igfs) -> Result<(), StoreError<Self::Error>>;

    /// Insert a new IGFS and return its generated id. Any id on the
    ///  payload is ignored.
    ///
    /// Should fail with `StoreError::DuplicateName` when another IGFS in
    ///  the same space already uses the name.
    async fn insert_igfs(&self, payload: &IgfsPayload) -> Result<IgfsId, StoreError<Self::Error>>;

    /// Set-add `igfs` to `igfss` on every cluster whose id is in `clusters`
    async fn add_igfs_to_clusters(
        &self,
        igfs: IgfsId,
        clusters: &[ClusterId],
    ) -> Result<u64, StoreError<Self::Error>>;

    /// Set-remove `igfs` from `igfss` on every cluster whose id is not in
    ///  `keep`, regardless of space
    async fn pull_igfs_from_clusters_except(
        &self,
        igfs: IgfsId,
        keep: &[ClusterId],
    ) -> Result<u64, StoreError<Self::Error>>;

    /// Delete the IGFS with `id`. Deleting a missing IGFS is not an error.
    async fn remove_igfs(&self, id: IgfsId) -> Result<u64, StoreError<Self::Error>>;

    /// Delete every IGFS belonging to one of `spaces`
    async fn remove_igfss_in_spaces(
        &self,
        spaces: &[SpaceId],
    ) -> Result<u64, StoreError<Self::Error>>;

    /// Empty `igfss` on every cluster belonging to one of `spaces`
    async fn reset_cluster_igfss_in_spaces(
        &self,
        spaces: &[SpaceId],
    ) -> Result<u64, StoreError<Self::Error>>;

    /// Set-remove `igfs` from `igfss` on every cluster
    async fn pull_igfs_from_all_clusters(
        &self,
        igfs: IgfsId,
    ) -> Result<u64, StoreError<Self::Error>> {
        self.pull_igfs_from_clusters_except(igfs, &[]).await
    }
}
