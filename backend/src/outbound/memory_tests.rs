//! Tests for the in-memory document store.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::{RecommendationKind, SetMutation, Username, Vote};

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid uid")
}

fn profile(raw: &str) -> UserProfile {
    UserProfile::new(
        uid(raw),
        Username::new(raw).expect("username"),
        EmailAddress::new(format!("{raw}@example.com")).expect("email"),
    )
}

#[fixture]
fn store() -> InMemoryDocumentStore {
    let recommendation = Recommendation::new(
        RecommendationId::new("r1").expect("id"),
        uid("alice"),
        uid("bob"),
        "Dune",
        RecommendationKind::Book,
    )
    .expect("valid recommendation");
    InMemoryDocumentStore::from_snapshot(StoreSnapshot {
        users: vec![profile("alice"), profile("bob")],
        recommendations: vec![recommendation],
    })
}

#[rstest]
#[tokio::test]
async fn finds_users_by_normalised_email(store: InMemoryDocumentStore) {
    let email = EmailAddress::new(" BOB@example.com").expect("email");
    let found = store.find_by_email(&email).await.expect("lookup");
    assert_eq!(found.map(|profile| profile.uid), Some(uid("bob")));

    let unknown = EmailAddress::new("carol@example.com").expect("email");
    assert_eq!(store.find_by_email(&unknown).await.expect("lookup"), None);
}

#[rstest]
#[tokio::test]
async fn batch_applies_every_operation(store: InMemoryDocumentStore) {
    store
        .apply_batch(&RelationshipBatch::friend_request(&uid("alice"), &uid("bob")))
        .await
        .expect("request batch");
    store
        .apply_batch(&RelationshipBatch::accept_request(&uid("bob"), &uid("alice")))
        .await
        .expect("accept batch");

    let alice = UserDirectory::find_by_id(&store, &uid("alice"))
        .await
        .expect("lookup")
        .expect("alice exists");
    let bob = UserDirectory::find_by_id(&store, &uid("bob"))
        .await
        .expect("lookup")
        .expect("bob exists");

    assert!(alice.is_friend(&uid("bob")));
    assert!(bob.is_friend(&uid("alice")));
    assert!(bob.friend_requests.is_empty());
    assert!(alice.sent_requests.is_empty());
}

#[rstest]
#[tokio::test]
async fn batch_touching_missing_document_changes_nothing(store: InMemoryDocumentStore) {
    let before = store.snapshot().expect("snapshot");

    let err = store
        .apply_batch(&RelationshipBatch::accept_request(&uid("alice"), &uid("ghost")))
        .await
        .expect_err("ghost does not exist");

    assert_eq!(err, UserDirectoryError::missing_document("ghost"));
    assert_eq!(store.snapshot().expect("snapshot"), before);
}

#[rstest]
#[tokio::test]
async fn single_set_mutations_are_idempotent(store: InMemoryDocumentStore) {
    for _ in 0..2 {
        store
            .add_to_set(&uid("alice"), SetField::Friends, &uid("bob"))
            .await
            .expect("add");
    }
    let alice = UserDirectory::find_by_id(&store, &uid("alice"))
        .await
        .expect("lookup")
        .expect("alice exists");
    assert_eq!(alice.friends.len(), 1);

    for _ in 0..2 {
        store
            .remove_from_set(&uid("alice"), SetField::Friends, &uid("bob"))
            .await
            .expect("remove");
    }
    let alice = UserDirectory::find_by_id(&store, &uid("alice"))
        .await
        .expect("lookup")
        .expect("alice exists");
    assert!(alice.friends.is_empty());
}

#[rstest]
#[case(SetMutation::Add)]
#[case(SetMutation::Remove)]
#[tokio::test]
async fn set_mutation_on_missing_document_fails(
    store: InMemoryDocumentStore,
    #[case] mutation: SetMutation,
) {
    let result = match mutation {
        SetMutation::Add => {
            store
                .add_to_set(&uid("ghost"), SetField::FriendRequests, &uid("alice"))
                .await
        }
        SetMutation::Remove => {
            store
                .remove_from_set(&uid("ghost"), SetField::FriendRequests, &uid("alice"))
                .await
        }
    };
    assert_eq!(result, Err(UserDirectoryError::missing_document("ghost")));
}

#[rstest]
#[tokio::test]
async fn queries_filter_by_sender_and_recipient(store: InMemoryDocumentStore) {
    let sent = store
        .query_by(RecommendationField::FromUid, &uid("alice"))
        .await
        .expect("query");
    let received = store
        .query_by(RecommendationField::ToUid, &uid("alice"))
        .await
        .expect("query");

    assert_eq!(sent.len(), 1);
    assert!(received.is_empty());
}

#[rstest]
#[tokio::test]
async fn vote_updates_only_vote_fields(store: InMemoryDocumentStore) {
    let id = RecommendationId::new("r1").expect("id");
    store
        .update_vote(&id, &VoteUpdate::new(Vote::Up, " superb "))
        .await
        .expect("update");

    let stored = RecommendationStore::find_by_id(&store, &id)
        .await
        .expect("lookup")
        .expect("exists");
    assert_eq!(stored.vote(), Some(Vote::Up));
    assert_eq!(stored.vote_note(), Some("superb"));
    assert_eq!(stored.title(), "Dune");
}

#[rstest]
#[tokio::test]
async fn vote_on_missing_document_fails(store: InMemoryDocumentStore) {
    let id = RecommendationId::new("nope").expect("id");
    let err = store
        .update_vote(&id, &VoteUpdate::new(Vote::Down, ""))
        .await
        .expect_err("missing");
    assert_eq!(err, RecommendationStoreError::missing_document("nope"));
}

#[rstest]
#[tokio::test]
async fn offline_store_reports_connection_errors(store: InMemoryDocumentStore) {
    store.set_offline(true);

    let err = UserDirectory::find_by_id(&store, &uid("alice"))
        .await
        .expect_err("offline");
    assert!(matches!(err, UserDirectoryError::Connection { .. }));

    let err = store
        .query_by(RecommendationField::ToUid, &uid("bob"))
        .await
        .expect_err("offline");
    assert!(matches!(err, RecommendationStoreError::Connection { .. }));

    store.set_offline(false);
    assert!(store.snapshot().is_ok());
}

#[rstest]
fn snapshot_round_trips_through_json(store: InMemoryDocumentStore) {
    let snapshot = store.snapshot().expect("snapshot");
    let json = serde_json::to_string(&snapshot).expect("serialise");
    let restored: StoreSnapshot = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(restored, snapshot);
}

#[rstest]
#[tokio::test]
async fn voting_preserves_stored_type_labels() {
    let snapshot: StoreSnapshot = serde_json::from_value(serde_json::json!({
        "users": [],
        "recommendations": [
            { "id": "r1", "fromUID": "alice", "toUID": "bob", "title": "Blue", "type": "Album" },
            { "id": "r2", "fromUID": "bob", "toUID": "alice", "title": "Up", "type": " Movie" }
        ]
    }))
    .expect("valid snapshot");
    let store = InMemoryDocumentStore::from_snapshot(snapshot);

    store
        .update_vote(
            &RecommendationId::new("r1").expect("id"),
            &VoteUpdate::new(Vote::Up, ""),
        )
        .await
        .expect("update");

    let saved = serde_json::to_value(store.snapshot().expect("snapshot")).expect("serialise");
    assert_eq!(saved["recommendations"][0]["type"], "Album");
    assert_eq!(saved["recommendations"][0]["vote"], true);
    assert_eq!(saved["recommendations"][1]["type"], " Movie");
}
