//! Friendship domain service.
//!
//! Implements the friend request state machine on top of the user directory.
//! Multi-document transitions (accept, remove) are always submitted as one
//! [`RelationshipBatch`]; the service never issues them as separate writes.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::ports::{
    FriendRequestOutcome, FriendRequestSummary, FriendSummary, FriendshipCommand,
    FriendshipQuery, RecommendationStore, UserDirectory,
};
use crate::domain::store_error_mapping::map_directory_error;
use crate::domain::{
    EmailAddress, Error, Recommendation, RecommendationField, RecommendationId,
    RelationshipBatch, SetField, UserId, UserProfile, aggregate_friend_stats,
};

/// Friendship service implementing the friendship driving ports.
pub struct FriendshipService<U, R> {
    users: Arc<U>,
    recommendations: Arc<R>,
}

impl<U, R> FriendshipService<U, R> {
    /// Create a new service over the given stores.
    pub fn new(users: Arc<U>, recommendations: Arc<R>) -> Self {
        Self {
            users,
            recommendations,
        }
    }
}

impl<U, R> FriendshipService<U, R>
where
    U: UserDirectory,
    R: RecommendationStore,
{
    async fn load_profile(&self, uid: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(uid)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {uid} does not exist")))
    }

    /// Read-path profile lookup: failures are logged and reported as absent.
    async fn profile_or_none(&self, uid: &UserId) -> Option<UserProfile> {
        match self.users.find_by_id(uid).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                warn!(%uid, "user document not found");
                None
            }
            Err(err) => {
                warn!(%uid, error = %err, "user lookup failed; treating as absent");
                None
            }
        }
    }

    async fn profiles_for<'a, I>(&self, uids: I) -> Vec<UserProfile>
    where
        I: IntoIterator<Item = &'a UserId>,
    {
        join_all(uids.into_iter().map(|uid| self.profile_or_none(uid)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn submit_batch(&self, batch: RelationshipBatch) -> Result<(), Error> {
        self.users
            .apply_batch(&batch)
            .await
            .map_err(map_directory_error)?;
        debug!(
            operations = batch.len(),
            documents = batch.touched_documents().len(),
            "relationship batch applied"
        );
        Ok(())
    }

    /// Recommendations sent or received by any of `friends`, deduplicated.
    async fn recommendations_involving(
        &self,
        friends: &[UserProfile],
    ) -> BTreeMap<RecommendationId, Recommendation> {
        let queries = friends.iter().flat_map(|friend| {
            [RecommendationField::FromUid, RecommendationField::ToUid]
                .into_iter()
                .map(move |field| self.recommendations.query_by(field, &friend.uid))
        });

        let mut merged = BTreeMap::new();
        for result in join_all(queries).await {
            match result {
                Ok(batch) => {
                    merged.extend(batch.into_iter().map(|rec| (rec.id().clone(), rec)));
                }
                Err(err) => warn!(error = %err, "recommendation query failed; stats may be partial"),
            }
        }
        merged
    }
}

#[async_trait]
impl<U, R> FriendshipCommand for FriendshipService<U, R>
where
    U: UserDirectory,
    R: RecommendationStore,
{
    async fn send_request(
        &self,
        requester: &UserId,
        target_email: &str,
    ) -> Result<FriendRequestOutcome, Error> {
        let email = EmailAddress::new(target_email)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let Some(target) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_directory_error)?
        else {
            debug!(%requester, "friend request target not registered");
            return Ok(FriendRequestOutcome::RecipientNotFound);
        };

        if &target.uid == requester {
            return Ok(FriendRequestOutcome::SelfRequest);
        }
        if target.is_friend(requester) {
            return Ok(FriendRequestOutcome::AlreadyFriends);
        }
        if target.has_request_from(requester) {
            return Ok(FriendRequestOutcome::AlreadyRequested);
        }

        self.submit_batch(RelationshipBatch::friend_request(requester, &target.uid))
            .await?;
        Ok(FriendRequestOutcome::Sent)
    }

    async fn accept_request(&self, current: &UserId, sender: &UserId) -> Result<(), Error> {
        let profile = self.load_profile(current).await?;
        if !profile.has_request_from(sender) && !profile.is_friend(sender) {
            return Err(Error::not_found(format!(
                "no pending friend request from {sender}"
            )));
        }

        self.submit_batch(RelationshipBatch::accept_request(current, sender))
            .await
    }

    async fn ignore_request(&self, current: &UserId, sender: &UserId) -> Result<(), Error> {
        // The sender's sentRequests entry is left in place.
        self.users
            .remove_from_set(current, SetField::FriendRequests, sender)
            .await
            .map_err(map_directory_error)?;
        debug!(%current, %sender, "friend request ignored");
        Ok(())
    }

    async fn remove_friend(&self, current: &UserId, friend: &UserId) -> Result<(), Error> {
        self.submit_batch(RelationshipBatch::remove_friendship(current, friend))
            .await
    }
}

#[async_trait]
impl<U, R> FriendshipQuery for FriendshipService<U, R>
where
    U: UserDirectory,
    R: RecommendationStore,
{
    async fn count_pending_requests(&self, caller: Option<&UserId>) -> usize {
        let Some(uid) = caller else {
            warn!("pending request count requested without a signed-in user");
            return 0;
        };
        self.profile_or_none(uid)
            .await
            .map_or(0, |profile| profile.pending_request_count())
    }

    async fn list_friend_requests(&self, uid: &UserId) -> Vec<FriendRequestSummary> {
        let Some(profile) = self.profile_or_none(uid).await else {
            return Vec::new();
        };

        self.profiles_for(&profile.friend_requests)
            .await
            .into_iter()
            .map(|sender| FriendRequestSummary {
                uid: sender.uid,
                username: sender.username,
            })
            .collect()
    }

    async fn list_friends(&self, uid: &UserId) -> Vec<FriendSummary> {
        let Some(profile) = self.profile_or_none(uid).await else {
            return Vec::new();
        };

        let friends = self.profiles_for(&profile.friends).await;
        let recommendations = self.recommendations_involving(&friends).await;

        friends
            .into_iter()
            .map(|friend| {
                let stats = aggregate_friend_stats(&friend.uid, recommendations.values());
                FriendSummary {
                    uid: friend.uid,
                    username: friend.username,
                    stats,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "friendship_service_tests.rs"]
mod tests;
