use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AtStep, IgfsError, Step};
use crate::model::{ClusterId, ClusterOption, Igfs, PrincipalId, Space, SpaceId};
use crate::ownership::accessible_spaces;
use crate::store::DocumentStore;

/// Everything a principal sees when managing IGFS configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IgfsListing {
    pub spaces: Vec<Space>,
    pub clusters: Vec<ClusterOption>,
    pub igfss: Vec<Igfs>,
}

/// Assemble the listing for `principal`.
///
/// Cluster ids on an IGFS that do not match a listed cluster (for example
///  a cluster deleted elsewhere) are dropped from the returned copy only.
///  Storage is never modified here.
pub async fn list_for_principal<S: DocumentStore>(
    store: &S,
    principal: PrincipalId,
) -> Result<IgfsListing, IgfsError<S::Error>> {
    let spaces = accessible_spaces(store, principal).await?;
    let space_ids: Vec<SpaceId> = spaces.iter().map(|s| s.id).collect();

    let clusters = store
        .clusters_in_spaces(&space_ids)
        .await
        .at_step(Step::ListClusters)?;

    let mut igfss = store
        .igfss_in_spaces(&space_ids)
        .await
        .at_step(Step::ListIgfss)?;

    let known: HashSet<ClusterId> = clusters.iter().map(|c| c.id).collect();
    for igfs in igfss.iter_mut() {
        igfs.clusters.retain(|id| known.contains(id));
    }

    Ok(IgfsListing {
        spaces,
        clusters: clusters.into_iter().map(ClusterOption::from).collect(),
        igfss,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cluster, IgfsPayload};
    use crate::store::MemoryStore;
    use crate::sync::save_igfs;

    #[tokio::test]
    async fn test_listing_is_scoped_and_ordered() {
        let store = MemoryStore::new();
        let alice = PrincipalId::new();
        let mine = Space::new("mine", alice);
        let theirs = Space::new("theirs", PrincipalId::new());
        store.insert_space(mine.clone()).unwrap();
        store.insert_space(theirs.clone()).unwrap();

        let zeta = Cluster::new("zeta", mine.id);
        let alpha = Cluster::new("alpha", mine.id);
        let hidden = Cluster::new("hidden", theirs.id);
        for c in [&zeta, &alpha, &hidden] {
            store.insert_cluster(c.clone()).unwrap();
        }

        for name in ["b-fs", "a-fs"] {
            save_igfs(&store, IgfsPayload::new(name, mine.id))
                .await
                .unwrap();
        }
        save_igfs(&store, IgfsPayload::new("other", theirs.id))
            .await
            .unwrap();

        let listing = list_for_principal(&store, alice).await.unwrap();

        assert_eq!(listing.spaces, vec![mine]);
        let labels: Vec<&str> = listing.clusters.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "zeta"]);
        assert_eq!(listing.clusters[0].value, alpha.id);
        let names: Vec<&str> = listing.igfss.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a-fs", "b-fs"]);
    }

    #[tokio::test]
    async fn test_listing_for_stranger_is_empty() {
        let store = MemoryStore::new();
        store
            .insert_space(Space::new("s", PrincipalId::new()))
            .unwrap();

        let listing = list_for_principal(&store, PrincipalId::new())
            .await
            .unwrap();
        assert_eq!(listing, IgfsListing::default());
    }
}
