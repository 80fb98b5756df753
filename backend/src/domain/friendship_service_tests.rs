//! Tests for the friendship service.

use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockRecommendationStore, MockUserDirectory, RecommendationStoreError, UserDirectoryError,
};
use crate::domain::{
    ErrorCode, RecommendationKind, SetMutation, SetOperation, Username, Vote,
};
use rstest::rstest;

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid uid")
}

fn profile(raw: &str) -> UserProfile {
    UserProfile::new(
        uid(raw),
        Username::new(format!("{raw}-name")).expect("username"),
        EmailAddress::new(format!("{raw}@example.com")).expect("email"),
    )
}

fn make_service(
    users: MockUserDirectory,
    recommendations: MockRecommendationStore,
) -> FriendshipService<MockUserDirectory, MockRecommendationStore> {
    FriendshipService::new(Arc::new(users), Arc::new(recommendations))
}

fn directory_with(profiles: Vec<UserProfile>) -> MockUserDirectory {
    let by_id: HashMap<UserId, UserProfile> = profiles
        .into_iter()
        .map(|profile| (profile.uid.clone(), profile))
        .collect();
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_id()
        .returning(move |uid| Ok(by_id.get(uid).cloned()));
    users
}

fn rec(id: &str, from: &str, to: &str, vote: Option<Vote>) -> Recommendation {
    Recommendation::new(
        RecommendationId::new(id).expect("id"),
        uid(from),
        uid(to),
        "Title",
        RecommendationKind::Book,
    )
    .expect("valid recommendation")
    .with_vote(vote)
}

#[tokio::test]
async fn send_request_records_both_views() {
    let target = profile("bob");
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_email()
        .withf(|email: &EmailAddress| email.as_ref() == "bob@example.com")
        .times(1)
        .return_once(move |_| Ok(Some(target)));
    users
        .expect_apply_batch()
        .withf(|batch: &RelationshipBatch| {
            *batch == RelationshipBatch::friend_request(&uid("alice"), &uid("bob"))
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(users, MockRecommendationStore::new());
    let outcome = service
        .send_request(&uid("alice"), "  Bob@Example.com ")
        .await
        .expect("request succeeds");

    assert_eq!(outcome, FriendRequestOutcome::Sent);
    assert!(outcome.changed_state());
}

#[rstest]
#[case::self_request("alice", vec![], FriendRequestOutcome::SelfRequest)]
#[case::already_friends("bob", vec!["friends"], FriendRequestOutcome::AlreadyFriends)]
#[case::already_requested("bob", vec!["requests"], FriendRequestOutcome::AlreadyRequested)]
#[tokio::test]
async fn send_request_is_a_no_op_for_existing_relations(
    #[case] target_uid: &str,
    #[case] relations: Vec<&str>,
    #[case] expected: FriendRequestOutcome,
) {
    let mut target = profile(target_uid);
    if relations.contains(&"friends") {
        target.friends.insert(uid("alice"));
    }
    if relations.contains(&"requests") {
        target.friend_requests.insert(uid("alice"));
    }

    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(target)));
    users.expect_apply_batch().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    let outcome = service
        .send_request(&uid("alice"), &format!("{target_uid}@example.com"))
        .await
        .expect("no-op still succeeds");

    assert_eq!(outcome, expected);
    assert!(!outcome.changed_state());
}

#[tokio::test]
async fn send_request_to_unknown_email_reports_success_without_writes() {
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));
    users.expect_apply_batch().times(0);
    users.expect_add_to_set().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    let outcome = service
        .send_request(&uid("A"), "missing@x.com")
        .await
        .expect("lookup miss is not an error");

    assert_eq!(outcome, FriendRequestOutcome::RecipientNotFound);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("no-at-sign")]
#[tokio::test]
async fn send_request_rejects_malformed_email(#[case] email: &str) {
    let mut users = MockUserDirectory::new();
    users.expect_find_by_email().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .send_request(&uid("alice"), email)
        .await
        .expect_err("malformed email rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn send_request_propagates_store_outage() {
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserDirectoryError::connection("deadline exceeded")));

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .send_request(&uid("alice"), "bob@example.com")
        .await
        .expect_err("outage surfaces");

    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
}

#[tokio::test]
async fn accept_request_submits_one_atomic_batch() {
    let mut alice = profile("alice");
    alice.friend_requests.insert(uid("bob"));
    let mut users = directory_with(vec![alice]);
    users
        .expect_apply_batch()
        .withf(|batch: &RelationshipBatch| {
            let ops = batch.operations();
            ops.len() == 4
                && ops.contains(&SetOperation::add(&uid("alice"), SetField::Friends, &uid("bob")))
                && ops.contains(&SetOperation::add(&uid("bob"), SetField::Friends, &uid("alice")))
                && ops.contains(&SetOperation::remove(
                    &uid("alice"),
                    SetField::FriendRequests,
                    &uid("bob"),
                ))
        })
        .times(1)
        .return_once(|_| Ok(()));
    users.expect_add_to_set().times(0);
    users.expect_remove_from_set().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    service
        .accept_request(&uid("alice"), &uid("bob"))
        .await
        .expect("accept succeeds");
}

#[tokio::test]
async fn accept_request_without_pending_request_is_not_found() {
    let mut users = directory_with(vec![profile("alice")]);
    users.expect_apply_batch().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .accept_request(&uid("alice"), &uid("mallory"))
        .await
        .expect_err("no request to accept");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn accept_request_for_missing_user_is_not_found() {
    let users = directory_with(Vec::new());

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .accept_request(&uid("ghost"), &uid("bob"))
        .await
        .expect_err("missing profile");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(UserDirectoryError::connection("timeout"), ErrorCode::StoreUnavailable)]
#[case(UserDirectoryError::missing_document("bob"), ErrorCode::NotFound)]
#[case(UserDirectoryError::partial_write(2_usize, 4_usize), ErrorCode::PartialWriteDetected)]
#[tokio::test]
async fn accept_request_reports_batch_failures(
    #[case] failure: UserDirectoryError,
    #[case] expected: ErrorCode,
) {
    let mut alice = profile("alice");
    alice.friend_requests.insert(uid("bob"));
    let mut users = directory_with(vec![alice]);
    users
        .expect_apply_batch()
        .times(1)
        .return_once(move |_| Err(failure));

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .accept_request(&uid("alice"), &uid("bob"))
        .await
        .expect_err("failure is not reported as success");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn ignore_request_only_touches_current_users_requests() {
    let mut users = MockUserDirectory::new();
    users
        .expect_remove_from_set()
        .withf(|target: &UserId, field: &SetField, value: &UserId| {
            target.as_ref() == "alice"
                && *field == SetField::FriendRequests
                && value.as_ref() == "bob"
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    users.expect_apply_batch().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    service
        .ignore_request(&uid("alice"), &uid("bob"))
        .await
        .expect("ignore succeeds");
}

#[tokio::test]
async fn ignore_request_propagates_failures() {
    let mut users = MockUserDirectory::new();
    users
        .expect_remove_from_set()
        .return_once(|_, _, _| Err(UserDirectoryError::connection("offline")));

    let service = make_service(users, MockRecommendationStore::new());
    let err = service
        .ignore_request(&uid("alice"), &uid("bob"))
        .await
        .expect_err("write failure surfaces");

    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
}

#[tokio::test]
async fn remove_friend_submits_symmetric_batch() {
    let mut users = MockUserDirectory::new();
    users
        .expect_apply_batch()
        .withf(|batch: &RelationshipBatch| {
            batch.len() == 2
                && batch
                    .operations()
                    .iter()
                    .all(|op| op.mutation == SetMutation::Remove && op.field == SetField::Friends)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(users, MockRecommendationStore::new());
    service
        .remove_friend(&uid("alice"), &uid("bob"))
        .await
        .expect("remove succeeds");
}

#[tokio::test]
async fn pending_count_is_zero_when_signed_out() {
    let mut users = MockUserDirectory::new();
    users.expect_find_by_id().times(0);

    let service = make_service(users, MockRecommendationStore::new());
    assert_eq!(service.count_pending_requests(None).await, 0);
}

#[tokio::test]
async fn pending_count_degrades_to_zero_on_errors() {
    let mut users = MockUserDirectory::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserDirectoryError::connection("offline")));

    let service = make_service(users, MockRecommendationStore::new());
    assert_eq!(service.count_pending_requests(Some(&uid("alice"))).await, 0);
}

#[tokio::test]
async fn pending_count_reads_friend_requests() {
    let mut alice = profile("alice");
    alice.friend_requests.insert(uid("bob"));
    alice.friend_requests.insert(uid("carol"));

    let service = make_service(directory_with(vec![alice]), MockRecommendationStore::new());
    assert_eq!(service.count_pending_requests(Some(&uid("alice"))).await, 2);
    assert_eq!(service.count_pending_requests(Some(&uid("nobody"))).await, 0);
}

#[tokio::test]
async fn friend_requests_skip_unresolvable_senders() {
    let mut alice = profile("alice");
    alice.friend_requests.insert(uid("bob"));
    alice.friend_requests.insert(uid("deleted"));

    let service = make_service(
        directory_with(vec![alice, profile("bob")]),
        MockRecommendationStore::new(),
    );
    let requests = service.list_friend_requests(&uid("alice")).await;

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uid, uid("bob"));
    assert_eq!(requests[0].username.as_ref(), "bob-name");
}

#[tokio::test]
async fn list_friends_aggregates_deduplicated_stats() {
    let mut alice = profile("alice");
    alice.friends.insert(uid("bob"));
    let bob_sent_up = rec("r1", "bob", "alice", Some(Vote::Up));
    let bob_sent_down = rec("r2", "bob", "carol", Some(Vote::Down));
    let bob_received = rec("r3", "alice", "bob", Some(Vote::Up));
    let unvoted = rec("r4", "bob", "alice", None);

    let mut recommendations = MockRecommendationStore::new();
    recommendations
        .expect_query_by()
        .returning(move |field, _| match field {
            RecommendationField::FromUid => Ok(vec![
                bob_sent_up.clone(),
                bob_sent_down.clone(),
                unvoted.clone(),
            ]),
            RecommendationField::ToUid => Ok(vec![bob_received.clone(), bob_sent_up.clone()]),
        });

    let service = make_service(directory_with(vec![alice, profile("bob")]), recommendations);
    let friends = service.list_friends(&uid("alice")).await;

    assert_eq!(friends.len(), 1);
    let stats = friends[0].stats;
    assert_eq!(stats.sent_thumbs_up, 1);
    assert_eq!(stats.sent_total, 2);
    assert_eq!(stats.sent_percentage(), 50);
    assert_eq!(stats.received_thumbs_up, 1);
    assert_eq!(stats.received_total, 1);
}

#[tokio::test]
async fn list_friends_tolerates_recommendation_outage() {
    let mut alice = profile("alice");
    alice.friends.insert(uid("bob"));

    let mut recommendations = MockRecommendationStore::new();
    recommendations
        .expect_query_by()
        .returning(|_, _| Err(RecommendationStoreError::connection("offline")));

    let service = make_service(directory_with(vec![alice, profile("bob")]), recommendations);
    let friends = service.list_friends(&uid("alice")).await;

    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].stats.sent_total, 0);
}
