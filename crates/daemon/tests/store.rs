//! IGFS management against the SQLite document store

mod common;

use ::common::prelude::{
    Cluster, DocumentStore, IgfsError, IgfsPayload, PrincipalId, Space, StoreError,
};

#[tokio::test]
async fn test_create_links_both_ways() {
    let env = common::setup_test_env().await;
    let (c1, c2) = (&env.clusters[0], &env.clusters[1]);

    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1.id, c2.id]))
        .await
        .unwrap();

    let all: Vec<_> = env.clusters.iter().map(|c| c.id).collect();
    common::assert_linked_both_ways(&env.db, &[id], &all).await;
    assert_eq!(common::cluster_igfss(&env.db, c1.id).await, vec![id]);
}

#[tokio::test]
async fn test_settings_survive_storage() {
    let env = common::setup_test_env().await;
    let settings = serde_json::json!({
        "blockSize": 65536,
        "secondaryFileSystem": {"uri": "hdfs://localhost:9000", "userName": null},
        "pathModes": [{"path": "/tmp", "mode": "PRIMARY"}],
    });

    let mut payload = IgfsPayload::new("fs", env.space.id);
    payload.settings = settings.as_object().unwrap().clone();
    let id = env.manager.save(payload).await.unwrap();

    let stored = env.db.get_igfs(id).await.unwrap().unwrap();
    assert_eq!(serde_json::Value::Object(stored.settings), settings);
}

#[tokio::test]
async fn test_reassignment_unlinks_dropped_clusters() {
    let env = common::setup_test_env().await;
    let (c1, c2, c3) = (&env.clusters[0], &env.clusters[1], &env.clusters[2]);

    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1.id, c2.id]))
        .await
        .unwrap();
    env.manager
        .save(
            IgfsPayload::new("fs", env.space.id)
                .with_id(id)
                .with_clusters([c2.id, c3.id]),
        )
        .await
        .unwrap();

    assert!(common::cluster_igfss(&env.db, c1.id).await.is_empty());
    assert_eq!(common::cluster_igfss(&env.db, c2.id).await, vec![id]);
    assert_eq!(common::cluster_igfss(&env.db, c3.id).await, vec![id]);
    let stored = env.db.get_igfs(id).await.unwrap().unwrap();
    assert_eq!(stored.clusters, vec![c2.id, c3.id]);
}

#[tokio::test]
async fn test_repeated_save_is_idempotent() {
    let env = common::setup_test_env().await;
    let c1 = &env.clusters[0];

    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1.id]))
        .await
        .unwrap();
    let payload = IgfsPayload::new("fs", env.space.id)
        .with_id(id)
        .with_clusters([c1.id]);
    env.manager.save(payload.clone()).await.unwrap();
    env.manager.save(payload).await.unwrap();

    assert_eq!(common::cluster_igfss(&env.db, c1.id).await, vec![id]);
}

#[tokio::test]
async fn test_cluster_membership_keeps_insertion_order() {
    let env = common::setup_test_env().await;
    let c1 = &env.clusters[0];

    let mut ids = Vec::new();
    for name in ["b", "a", "c"] {
        let id = env
            .manager
            .save(IgfsPayload::new(name, env.space.id).with_clusters([c1.id]))
            .await
            .unwrap();
        ids.push(id);
    }

    assert_eq!(common::cluster_igfss(&env.db, c1.id).await, ids);
}

#[tokio::test]
async fn test_names_unique_per_space() {
    let env = common::setup_test_env().await;
    let other = Space::new("other", env.owner);
    env.db.insert_space(&other).await.unwrap();

    let first = env
        .manager
        .save(IgfsPayload::new("A", env.space.id))
        .await
        .unwrap();

    let err = env
        .manager
        .save(IgfsPayload::new("A", env.space.id))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IgfsError::NameConflict { ref name, existing: Some(existing) } if name == "A" && existing == first
    ));
    assert_eq!(err.to_string(), "IGFS with name: \"A\" already exist.");

    env.manager
        .save(IgfsPayload::new("A", other.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_index_rejects_rename_onto_taken_name() {
    let env = common::setup_test_env().await;
    let a = env
        .manager
        .save(IgfsPayload::new("A", env.space.id))
        .await
        .unwrap();
    let b = env
        .manager
        .save(IgfsPayload::new("B", env.space.id))
        .await
        .unwrap();

    let err = env
        .manager
        .save(IgfsPayload::new("A", env.space.id).with_id(b))
        .await
        .unwrap_err();
    assert!(matches!(err, IgfsError::NameConflict { existing: Some(holder), .. } if holder == a));

    let stored = env.db.get_igfs(b).await.unwrap().unwrap();
    assert_eq!(stored.name, "B");
}

#[tokio::test]
async fn test_store_reports_duplicate_insert() {
    let env = common::setup_test_env().await;
    let payload = IgfsPayload::new("A", env.space.id);
    env.db.insert_igfs(&payload).await.unwrap();

    let err = env.db.insert_igfs(&payload).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateName { space, ref name } if space == env.space.id && name == "A"
    ));
}

#[tokio::test]
async fn test_unknown_cluster_ids_link_nothing() {
    let env = common::setup_test_env().await;
    let ghost = Cluster::new("ghost", env.space.id);

    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([ghost.id]))
        .await
        .unwrap();

    let stored = env.db.get_igfs(id).await.unwrap().unwrap();
    assert_eq!(stored.clusters, vec![ghost.id]);
    assert!(env.db.get_cluster(ghost.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_all_cascades() {
    let env = common::setup_test_env().await;
    let (c1, c2) = (&env.clusters[0], &env.clusters[1]);
    let f1 = env
        .manager
        .save(IgfsPayload::new("f1", env.space.id).with_clusters([c1.id]))
        .await
        .unwrap();
    let f2 = env
        .manager
        .save(IgfsPayload::new("f2", env.space.id).with_clusters([c1.id, c2.id]))
        .await
        .unwrap();

    assert_eq!(env.manager.remove_all(env.owner).await.unwrap(), 2);

    assert!(env.db.get_igfs(f1).await.unwrap().is_none());
    assert!(env.db.get_igfs(f2).await.unwrap().is_none());
    assert!(common::cluster_igfss(&env.db, c1.id).await.is_empty());
    assert!(common::cluster_igfss(&env.db, c2.id).await.is_empty());
}

#[tokio::test]
async fn test_remove_all_reaches_shared_spaces_only() {
    let env = common::setup_test_env().await;
    let member = PrincipalId::new();

    let shared = Space::new("shared", PrincipalId::new()).share_with(member);
    let private = Space::new("private", PrincipalId::new());
    env.db.insert_space(&shared).await.unwrap();
    env.db.insert_space(&private).await.unwrap();
    let shared_cluster = common::add_clusters(&env.db, shared.id, &["sc"]).await.remove(0);
    let private_cluster = common::add_clusters(&env.db, private.id, &["pc"]).await.remove(0);

    let in_shared = env
        .manager
        .save(IgfsPayload::new("fs", shared.id).with_clusters([shared_cluster.id]))
        .await
        .unwrap();
    let in_private = env
        .manager
        .save(IgfsPayload::new("fs", private.id).with_clusters([private_cluster.id]))
        .await
        .unwrap();

    assert_eq!(env.manager.remove_all(member).await.unwrap(), 1);

    assert!(env.db.get_igfs(in_shared).await.unwrap().is_none());
    assert!(common::cluster_igfss(&env.db, shared_cluster.id).await.is_empty());
    assert!(env.db.get_igfs(in_private).await.unwrap().is_some());
    assert_eq!(
        common::cluster_igfss(&env.db, private_cluster.id).await,
        vec![in_private]
    );
}

#[tokio::test]
async fn test_remove_strips_references_everywhere() {
    let env = common::setup_test_env().await;
    let c1 = &env.clusters[0];

    // A cluster in another space that still points at the IGFS
    let elsewhere = Space::new("elsewhere", PrincipalId::new());
    env.db.insert_space(&elsewhere).await.unwrap();

    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1.id]))
        .await
        .unwrap();
    let mut stale = Cluster::new("stale", elsewhere.id);
    stale.igfss.push(id);
    env.db.insert_cluster(&stale).await.unwrap();

    assert!(env.manager.remove(id).await.unwrap());

    assert!(env.db.get_igfs(id).await.unwrap().is_none());
    assert!(common::cluster_igfss(&env.db, c1.id).await.is_empty());
    assert!(common::cluster_igfss(&env.db, stale.id).await.is_empty());

    assert!(!env.manager.remove(id).await.unwrap());
}

#[tokio::test]
async fn test_list_hides_deleted_clusters() {
    let env = common::setup_test_env().await;
    let (c1, c2) = (&env.clusters[0], &env.clusters[1]);
    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1.id, c2.id]))
        .await
        .unwrap();

    assert!(env.db.delete_cluster(c2.id).await.unwrap());

    let listing = env.manager.list(env.owner).await.unwrap();
    let labels: Vec<_> = listing.clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["c1", "c3"]);
    assert_eq!(listing.igfss.len(), 1);
    assert_eq!(listing.igfss[0].clusters, vec![c1.id]);

    let stored = env.db.get_igfs(id).await.unwrap().unwrap();
    assert_eq!(stored.clusters, vec![c1.id, c2.id]);
}

#[tokio::test]
async fn test_list_orders_and_shares() {
    let env = common::setup_test_env().await;
    let member = PrincipalId::new();
    let shared = Space::new("a-shared", PrincipalId::new()).share_with(member);
    env.db.insert_space(&shared).await.unwrap();

    let own = Space::new("b-own", member);
    env.db.insert_space(&own).await.unwrap();

    for name in ["zeta", "alpha"] {
        env.manager
            .save(IgfsPayload::new(name, shared.id))
            .await
            .unwrap();
    }

    let listing = env.manager.list(member).await.unwrap();
    let spaces: Vec<_> = listing.spaces.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(spaces, vec!["a-shared", "b-own"]);
    assert_eq!(listing.spaces[0].used_by.len(), 1);
    assert_eq!(listing.spaces[0].used_by[0].account, member);

    let names: Vec<_> = listing.igfss.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}
