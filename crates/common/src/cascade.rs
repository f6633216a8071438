//! IGFS deletion and the cluster references it leaves behind

use crate::error::{AtStep, IgfsError, Step};
use crate::model::{IgfsId, PrincipalId};
use crate::ownership::resolve_accessible_spaces;
use crate::store::DocumentStore;

/// Delete one IGFS and strip its id from every cluster. Returns whether
///  an IGFS record was actually deleted.
///
/// A missing IGFS is not an error; the cluster cleanup still runs so a
///  retry after a failed cleanup finishes the job.
pub async fn delete_igfs<S: DocumentStore>(
    store: &S,
    id: IgfsId,
) -> Result<bool, IgfsError<S::Error>> {
    let removed = store.remove_igfs(id).await.at_step(Step::RemoveIgfs)?;
    tracing::debug!(igfs = %id, removed, "removed igfs record");

    let stripped = store
        .pull_igfs_from_all_clusters(id)
        .await
        .at_step(Step::StripClusters)?;
    tracing::debug!(igfs = %id, stripped, "stripped igfs from clusters");

    Ok(removed > 0)
}

/// Delete every IGFS in the spaces `principal` can access and empty the
///  membership of every cluster in those spaces. Returns the number of
///  IGFS records deleted.
///
/// If emptying the clusters fails after the IGFS records are gone, the
///  clusters hold dangling ids until the call is retried.
pub async fn delete_all_for_principal<S: DocumentStore>(
    store: &S,
    principal: PrincipalId,
) -> Result<u64, IgfsError<S::Error>> {
    let spaces: Vec<_> = resolve_accessible_spaces(store, principal)
        .await?
        .into_iter()
        .collect();

    let removed = store
        .remove_igfss_in_spaces(&spaces)
        .await
        .at_step(Step::RemoveSpaceIgfss)?;
    tracing::debug!(principal = %principal, removed, "removed igfs records");

    let reset = store
        .reset_cluster_igfss_in_spaces(&spaces)
        .await
        .at_step(Step::ResetClusters)?;
    tracing::debug!(principal = %principal, reset, "reset cluster membership");

    Ok(removed)
}
