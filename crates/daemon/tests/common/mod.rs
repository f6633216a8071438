//! Shared test utilities for daemon integration tests
#![allow(dead_code)]

use ::common::prelude::{Cluster, ClusterId, DocumentStore, IgfsId, PrincipalId, Space, SpaceId};
use ::common::Manager;
use igfs_daemon::Database;

pub struct TestEnv {
    pub db: Database,
    pub manager: Manager<Database>,
    pub owner: PrincipalId,
    pub space: Space,
    pub clusters: Vec<Cluster>,
}

/// Create an in-memory test database
pub async fn setup_test_db() -> Database {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    Database::connect(&db_url).await.unwrap()
}

/// One space owned by a fresh principal, holding clusters c1, c2 and c3
pub async fn setup_test_env() -> TestEnv {
    let db = setup_test_db().await;
    let owner = PrincipalId::new();
    let space = Space::new("space", owner);
    db.insert_space(&space).await.unwrap();
    let clusters = add_clusters(&db, space.id, &["c1", "c2", "c3"]).await;

    TestEnv {
        manager: Manager::new(db.clone()),
        db,
        owner,
        space,
        clusters,
    }
}

pub async fn add_clusters(db: &Database, space: SpaceId, names: &[&str]) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    for name in names {
        let cluster = Cluster::new(*name, space);
        db.insert_cluster(&cluster).await.unwrap();
        clusters.push(cluster);
    }
    clusters
}

pub async fn cluster_igfss(db: &Database, id: ClusterId) -> Vec<IgfsId> {
    db.get_cluster(id).await.unwrap().unwrap().igfss
}

/// Every IGFS lists exactly the clusters that list it back
pub async fn assert_linked_both_ways(db: &Database, igfss: &[IgfsId], clusters: &[ClusterId]) {
    for igfs in igfss {
        let stored = db.get_igfs(*igfs).await.unwrap().unwrap();
        for cluster in clusters {
            let listed_by_igfs = stored.clusters.contains(cluster);
            let listed_by_cluster = cluster_igfss(db, *cluster).await.contains(igfs);
            assert_eq!(
                listed_by_igfs, listed_by_cluster,
                "igfs {} and cluster {} disagree",
                igfs, cluster
            );
        }
    }
}
