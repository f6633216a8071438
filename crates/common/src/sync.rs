//! Keeps `Igfs::clusters` and `Cluster::igfss` in agreement.
//!
//! A save touches the IGFS record and then every affected cluster, each
//!  through its own store call. There is no transaction across them:
//!
//! 1. the IGFS record is written first, so an interrupted save leaves an
//!    IGFS that is under-linked rather than clusters pointing at an IGFS
//!    that does not exist;
//! 2. cluster updates are set-add / set-remove only, so re-running a
//!    save from the top re-applies finished steps as no-ops;
//! 3. nothing is rolled back on failure. The error names the step that
//!    failed and the caller retries.
//!
//! Unlinking is not scoped by space. Cluster ids are assumed globally
//!  unique and the desired clusters are assumed to come from the IGFS's
//!  own space.

use crate::error::{AtStep, IgfsError, Step};
use crate::model::{IgfsId, IgfsPayload};
use crate::store::DocumentStore;
use crate::uniqueness::{ensure_name_available, identify_conflict};

/// Create or update an IGFS and bring cluster membership in line with
///  `payload.clusters`. Returns the IGFS id.
pub async fn save_igfs<S: DocumentStore>(
    store: &S,
    mut payload: IgfsPayload,
) -> Result<IgfsId, IgfsError<S::Error>> {
    payload.dedup_clusters();
    let stripped = payload.strip_reserved_settings();
    if !stripped.is_empty() {
        tracing::warn!(
            name = %payload.name,
            ?stripped,
            "dropped reserved keys from igfs settings"
        );
    }

    match payload.id {
        Some(id) => update_igfs(store, id, payload).await,
        None => create_igfs(store, payload).await,
    }
}

async fn update_igfs<S: DocumentStore>(
    store: &S,
    id: IgfsId,
    payload: IgfsPayload,
) -> Result<IgfsId, IgfsError<S::Error>> {
    let desired = payload.clusters.clone();
    let igfs = payload.into_igfs(id);

    if let Err(e) = store.upsert_igfs(&igfs).await {
        return Err(identify_conflict(store, Step::UpsertIgfs, e).await);
    }
    tracing::debug!(igfs = %id, "upserted igfs record");

    let linked = store
        .add_igfs_to_clusters(id, &desired)
        .await
        .at_step(Step::LinkClusters)?;
    tracing::debug!(igfs = %id, linked, "linked desired clusters");

    let unlinked = store
        .pull_igfs_from_clusters_except(id, &desired)
        .await
        .at_step(Step::UnlinkClusters)?;
    tracing::debug!(igfs = %id, unlinked, "unlinked other clusters");

    Ok(id)
}

async fn create_igfs<S: DocumentStore>(
    store: &S,
    payload: IgfsPayload,
) -> Result<IgfsId, IgfsError<S::Error>> {
    ensure_name_available(store, payload.space, &payload.name).await?;

    let id = match store.insert_igfs(&payload).await {
        Ok(id) => id,
        Err(e) => return Err(identify_conflict(store, Step::InsertIgfs, e).await),
    };
    tracing::debug!(igfs = %id, space = %payload.space, "inserted igfs record");

    let linked = store
        .add_igfs_to_clusters(id, &payload.clusters)
        .await
        .at_step(Step::LinkClusters)?;
    tracing::debug!(igfs = %id, linked, "linked desired clusters");

    Ok(id)
}
