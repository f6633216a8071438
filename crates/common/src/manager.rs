use crate::cascade::{delete_all_for_principal, delete_igfs};
use crate::error::IgfsError;
use crate::listing::{list_for_principal, IgfsListing};
use crate::model::{IgfsId, IgfsPayload, PrincipalId};
use crate::store::DocumentStore;
use crate::sync::save_igfs;

/// Entry point for the IGFS management operations over a document store.
///
/// Holds no state besides the store handle; membership is re-read from
///  storage on every call.
#[derive(Debug, Clone)]
pub struct Manager<S> {
    store: S,
}

impl<S: DocumentStore> Manager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Spaces, clusters and IGFS configurations visible to `principal`
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, principal: PrincipalId) -> Result<IgfsListing, IgfsError<S::Error>> {
        let listing = list_for_principal(&self.store, principal).await?;
        tracing::debug!(
            spaces = listing.spaces.len(),
            clusters = listing.clusters.len(),
            igfss = listing.igfss.len(),
            "assembled igfs listing"
        );
        Ok(listing)
    }

    /// Create (no `_id`) or replace (with `_id`) an IGFS and sync its
    ///  cluster membership
    #[tracing::instrument(skip(self, payload), fields(igfs = ?payload.id, name = %payload.name))]
    pub async fn save(&self, payload: IgfsPayload) -> Result<IgfsId, IgfsError<S::Error>> {
        let creating = payload.id.is_none();
        match save_igfs(&self.store, payload).await {
            Ok(id) => {
                tracing::info!(igfs = %id, created = creating, "saved igfs");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save igfs");
                Err(e)
            }
        }
    }

    /// Delete one IGFS and its cluster references. Returns whether the
    ///  IGFS existed.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: IgfsId) -> Result<bool, IgfsError<S::Error>> {
        let removed = delete_igfs(&self.store, id).await.inspect_err(|e| {
            tracing::warn!(error = %e, "failed to remove igfs");
        })?;
        tracing::info!(igfs = %id, removed, "removed igfs");
        Ok(removed)
    }

    /// Delete every IGFS `principal` can access. Returns how many were
    ///  deleted.
    #[tracing::instrument(skip(self))]
    pub async fn remove_all(&self, principal: PrincipalId) -> Result<u64, IgfsError<S::Error>> {
        let removed = delete_all_for_principal(&self.store, principal)
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, "failed to remove igfss");
            })?;
        tracing::info!(principal = %principal, removed, "removed all accessible igfss");
        Ok(removed)
    }
}
