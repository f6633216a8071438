//! Integration tests for IGFS removal and its cluster cascade

mod common;

use ::common::prelude::*;
use ::common::store::StoreOp;

#[tokio::test]
async fn test_remove_all_cascades_to_clusters() {
    let env = common::setup_test_env();
    let c1 = env.clusters[0].id;

    let f1 = env
        .manager
        .save(IgfsPayload::new("f1", env.space.id).with_clusters([c1]))
        .await
        .unwrap();
    let f2 = env
        .manager
        .save(IgfsPayload::new("f2", env.space.id).with_clusters([c1]))
        .await
        .unwrap();
    assert_eq!(common::cluster_igfss(&env.store, c1).await, vec![f1, f2]);

    assert_eq!(env.manager.remove_all(env.owner).await.unwrap(), 2);

    assert!(env.store.get_igfs(f1).await.unwrap().is_none());
    assert!(env.store.get_igfs(f2).await.unwrap().is_none());
    assert!(common::cluster_igfss(&env.store, c1).await.is_empty());
}

#[tokio::test]
async fn test_remove_all_leaves_inaccessible_spaces_alone() {
    let env = common::setup_test_env();
    let stranger = PrincipalId::new();
    let foreign = Space::new("foreign", stranger);
    env.store.insert_space(foreign.clone()).unwrap();
    let foreign_cluster = common::add_clusters(&env.store, foreign.id, &["fc"]).remove(0);

    let kept = env
        .manager
        .save(IgfsPayload::new("kept", foreign.id).with_clusters([foreign_cluster.id]))
        .await
        .unwrap();
    env.manager
        .save(IgfsPayload::new("gone", env.space.id))
        .await
        .unwrap();

    env.manager.remove_all(env.owner).await.unwrap();

    assert!(env.store.get_igfs(kept).await.unwrap().is_some());
    assert_eq!(
        common::cluster_igfss(&env.store, foreign_cluster.id).await,
        vec![kept]
    );
    let listing = env.manager.list(env.owner).await.unwrap();
    assert!(listing.igfss.is_empty());
}

#[tokio::test]
async fn test_remove_all_reaches_shared_spaces() {
    let env = common::setup_test_env();
    let guest = PrincipalId::new();
    let shared = Space::new("shared", env.owner).share_with(guest);
    env.store.insert_space(shared.clone()).unwrap();

    let id = env
        .manager
        .save(IgfsPayload::new("fs", shared.id))
        .await
        .unwrap();

    env.manager.remove_all(guest).await.unwrap();
    assert!(env.store.get_igfs(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_all_retry_after_reset_failure() {
    let env = common::setup_test_env();
    let c1 = env.clusters[0].id;
    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1]))
        .await
        .unwrap();

    env.store.fail(StoreOp::ResetClusterIgfss).unwrap();
    let err = env.manager.remove_all(env.owner).await.unwrap_err();
    assert_eq!(err.step(), Some(Step::ResetClusters));

    // IGFS gone, cluster reference dangling until the retry
    assert!(env.store.get_igfs(id).await.unwrap().is_none());
    assert_eq!(common::cluster_igfss(&env.store, c1).await, vec![id]);

    env.store.clear_failures().unwrap();
    env.manager.remove_all(env.owner).await.unwrap();
    assert!(common::cluster_igfss(&env.store, c1).await.is_empty());
}

#[tokio::test]
async fn test_remove_single_strips_cluster_references() {
    let env = common::setup_test_env();
    let ids: Vec<ClusterId> = env.clusters.iter().map(|c| c.id).collect();

    let keep = env
        .manager
        .save(IgfsPayload::new("keep", env.space.id).with_clusters(ids.clone()))
        .await
        .unwrap();
    let dropped = env
        .manager
        .save(IgfsPayload::new("dropped", env.space.id).with_clusters(ids.clone()))
        .await
        .unwrap();

    assert!(env.manager.remove(dropped).await.unwrap());

    assert!(env.store.get_igfs(dropped).await.unwrap().is_none());
    for id in &ids {
        assert_eq!(common::cluster_igfss(&env.store, *id).await, vec![keep]);
    }
    common::assert_linked_both_ways(&env.store, &[keep, dropped], &ids).await;
}

#[tokio::test]
async fn test_remove_missing_igfs_succeeds() {
    let env = common::setup_test_env();
    assert!(!env.manager.remove(IgfsId::new()).await.unwrap());
}

#[tokio::test]
async fn test_remove_retry_after_strip_failure() {
    let env = common::setup_test_env();
    let c1 = env.clusters[0].id;
    let id = env
        .manager
        .save(IgfsPayload::new("fs", env.space.id).with_clusters([c1]))
        .await
        .unwrap();

    env.store.fail(StoreOp::PullIgfsFromClusters).unwrap();
    let err = env.manager.remove(id).await.unwrap_err();
    assert_eq!(err.step(), Some(Step::StripClusters));

    // Record deleted first; the cluster keeps the stale id until the retry
    assert!(env.store.get_igfs(id).await.unwrap().is_none());
    assert_eq!(common::cluster_igfss(&env.store, c1).await, vec![id]);

    env.store.clear_failures().unwrap();
    assert!(!env.manager.remove(id).await.unwrap());
    assert!(common::cluster_igfss(&env.store, c1).await.is_empty());
}
