//! Graph query service tests over an in-memory store.

use vtube_engine::{EngagementGuard, ErrorKind, GraphQueryService};
use vtube_models::{UserId, Viewer};
use vtube_store::{Db, UserRepository};

async fn setup(n: usize) -> (GraphQueryService, EngagementGuard, Vec<UserId>) {
    let db = Db::in_memory().await.unwrap();
    let users = UserRepository::new(db.clone());
    let mut ids = Vec::new();
    for i in 0..n {
        ids.push(users.create(&format!("user{i}")).await.unwrap().id);
    }
    (
        GraphQueryService::new(db.clone()),
        EngagementGuard::new(db),
        ids,
    )
}

#[tokio::test]
async fn counts_track_both_directions() {
    let (graph, guard, ids) = setup(3).await;

    guard.follow(ids[1], ids[0]).await.unwrap();
    guard.follow(ids[2], ids[0]).await.unwrap();
    guard.follow(ids[0], ids[1]).await.unwrap();

    let counts = graph.relationship_counts(ids[0]).await.unwrap();
    assert_eq!(counts.followers, 2);
    assert_eq!(counts.following, 1);
}

#[tokio::test]
async fn counts_for_missing_user_is_not_found() {
    let (graph, _, _) = setup(1).await;
    let err = graph.relationship_counts(UserId(42)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn annotated_following_reflects_the_viewer() {
    let (graph, guard, ids) = setup(4).await;
    let (viewer, subject, mutual, plain) = (ids[0], ids[1], ids[2], ids[3]);

    // Subject follows `mutual` and `plain`, in that order.
    guard.follow(subject, mutual).await.unwrap();
    guard.follow(subject, plain).await.unwrap();

    // Viewer and `mutual` follow each other; viewer does not follow `plain`.
    guard.follow(viewer, mutual).await.unwrap();
    guard.follow(mutual, viewer).await.unwrap();

    let listed = graph
        .annotated_following(&Viewer::User(viewer), subject)
        .await
        .unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].user.id, mutual);
    assert!(listed[0].is_following);
    assert!(listed[0].is_mutual);
    assert_eq!(listed[1].user.id, plain);
    assert!(!listed[1].is_following);
    assert!(!listed[1].is_mutual);
}

#[tokio::test]
async fn mutual_requires_both_directions_for_the_viewer() {
    let (graph, guard, ids) = setup(3).await;
    let (viewer, subject, target) = (ids[0], ids[1], ids[2]);

    guard.follow(subject, target).await.unwrap();
    // Target follows the viewer, but the viewer does not follow back.
    guard.follow(target, viewer).await.unwrap();

    let listed = graph
        .annotated_following(&Viewer::User(viewer), subject)
        .await
        .unwrap();
    assert!(!listed[0].is_following);
    assert!(!listed[0].is_mutual);
}

#[tokio::test]
async fn annotated_followers_lists_the_other_direction() {
    let (graph, guard, ids) = setup(3).await;
    let (viewer, subject, fan) = (ids[0], ids[1], ids[2]);

    guard.follow(fan, subject).await.unwrap();
    guard.follow(viewer, fan).await.unwrap();

    let listed = graph
        .annotated_followers(&Viewer::User(viewer), subject)
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user.id, fan);
    assert!(listed[0].is_following);
    assert!(!listed[0].is_mutual);
}

#[tokio::test]
async fn anonymous_viewer_gets_false_flags_not_errors() {
    let (graph, guard, ids) = setup(3).await;
    guard.follow(ids[1], ids[0]).await.unwrap();
    guard.follow(ids[0], ids[2]).await.unwrap();

    assert!(!graph.is_following(&Viewer::Anonymous, ids[0]).await.unwrap());

    let followers = graph
        .annotated_followers(&Viewer::Anonymous, ids[0])
        .await
        .unwrap();
    assert!(followers.iter().all(|a| !a.is_following && !a.is_mutual));

    let following = graph
        .annotated_following(&Viewer::Anonymous, ids[0])
        .await
        .unwrap();
    assert!(following.iter().all(|a| !a.is_following && !a.is_mutual));
}
