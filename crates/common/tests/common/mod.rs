//! Shared setup for IGFS manager integration tests
#![allow(dead_code)]

use ::common::prelude::*;
use ::common::store::MemoryStore;

pub struct TestEnv {
    pub manager: Manager<MemoryStore>,
    pub store: MemoryStore,
    pub owner: PrincipalId,
    pub space: Space,
    pub clusters: Vec<Cluster>,
}

/// A principal owning one space with clusters c1, c2 and c3
pub fn setup_test_env() -> TestEnv {
    let store = MemoryStore::new();
    let owner = PrincipalId::new();
    let space = Space::new("space", owner);
    store.insert_space(space.clone()).unwrap();

    let clusters = add_clusters(&store, space.id, &["c1", "c2", "c3"]);

    TestEnv {
        manager: Manager::new(store.clone()),
        store,
        owner,
        space,
        clusters,
    }
}

pub fn add_clusters(store: &MemoryStore, space: SpaceId, names: &[&str]) -> Vec<Cluster> {
    names
        .iter()
        .map(|name| {
            let cluster = Cluster::new(*name, space);
            store.insert_cluster(cluster.clone()).unwrap();
            cluster
        })
        .collect()
}

/// Assert `f.clusters` contains `c` exactly when `c.igfss` contains `f`
///  for every pair drawn from `igfss` x `clusters`
pub async fn assert_linked_both_ways(store: &MemoryStore, igfss: &[IgfsId], clusters: &[ClusterId]) {
    for igfs_id in igfss {
        let igfs = store.get_igfs(*igfs_id).await.unwrap();
        for cluster_id in clusters {
            let cluster = store.get_cluster(*cluster_id).await.unwrap().unwrap();
            let forward = cluster.igfss.contains(igfs_id);
            let back = igfs
                .as_ref()
                .map(|f| f.clusters.contains(cluster_id))
                .unwrap_or(false);
            assert_eq!(
                forward, back,
                "igfs {} and cluster {} disagree (cluster side {}, igfs side {})",
                igfs_id, cluster_id, forward, back
            );
        }
    }
}

pub async fn cluster_igfss(store: &MemoryStore, id: ClusterId) -> Vec<IgfsId> {
    store.get_cluster(id).await.unwrap().unwrap().igfss
}
