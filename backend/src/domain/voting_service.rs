//! Recommendation voting and feed service.
//!
//! Only the recipient of a recommendation may vote on it. Reads never fail:
//! store errors are logged and degrade to empty results so inbound adapters
//! can always render something.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    FeedDirection, FeedEntry, RecommendationDetail, RecommendationQuery, RecommendationStore,
    UNKNOWN_USERNAME, UserDirectory, ViewerRole, VoteCommand,
};
use crate::domain::store_error_mapping::map_recommendation_error;
use crate::domain::{
    Error, Recommendation, RecommendationField, RecommendationId, StatsRole, UserId, Vote,
    VoteTally, VoteUpdate, compute_stats, relative_time_label,
};

/// Service implementing [`VoteCommand`] and [`RecommendationQuery`].
pub struct RecommendationVotingService<R, U> {
    recommendations: Arc<R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, U> RecommendationVotingService<R, U> {
    /// Create a new service.
    ///
    /// `clock` drives the relative timestamps rendered in the feed.
    pub fn new(recommendations: Arc<R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            recommendations,
            users,
            clock,
        }
    }
}

impl<R, U> RecommendationVotingService<R, U>
where
    R: RecommendationStore,
    U: UserDirectory,
{
    async fn query_or_empty(&self, field: RecommendationField, uid: &UserId) -> Vec<Recommendation> {
        match self.recommendations.query_by(field, uid).await {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    %uid,
                    field = field.document_field(),
                    error = %err,
                    "recommendation query failed; returning no results"
                );
                Vec::new()
            }
        }
    }

    async fn username_of(&self, uid: &UserId) -> Option<String> {
        match self.users.find_by_id(uid).await {
            Ok(profile) => profile.map(|found| found.username.to_string()),
            Err(err) => {
                warn!(%uid, error = %err, "username lookup failed");
                None
            }
        }
    }

    /// Resolve display names for every uid at once.
    async fn usernames_for(&self, uids: BTreeSet<&UserId>) -> BTreeMap<UserId, String> {
        let lookups = uids.into_iter().map(|uid| async move {
            self.username_of(uid)
                .await
                .map(|username| (uid.clone(), username))
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[async_trait]
impl<R, U> VoteCommand for RecommendationVotingService<R, U>
where
    R: RecommendationStore,
    U: UserDirectory,
{
    async fn submit_vote(
        &self,
        id: &RecommendationId,
        caller: &UserId,
        vote: Vote,
        note: &str,
    ) -> Result<(), Error> {
        let recommendation = self
            .recommendations
            .find_by_id(id)
            .await
            .map_err(map_recommendation_error)?
            .ok_or_else(|| Error::not_found(format!("recommendation {id} does not exist")))?;

        if !recommendation.is_recipient(caller) {
            warn!(%id, %caller, "vote rejected: caller is not the recipient");
            return Err(Error::unauthorized(
                "only the recipient may vote on a recommendation",
            ));
        }

        let update = VoteUpdate::new(vote, note);
        self.recommendations
            .update_vote(id, &update)
            .await
            .map_err(map_recommendation_error)?;
        debug!(%id, vote = vote.glyph(), has_note = update.note.is_some(), "vote recorded");
        Ok(())
    }
}

#[async_trait]
impl<R, U> RecommendationQuery for RecommendationVotingService<R, U>
where
    R: RecommendationStore,
    U: UserDirectory,
{
    async fn load_feed(&self, uid: &UserId) -> Vec<FeedEntry> {
        let (sent, received) = futures_util::join!(
            self.query_or_empty(RecommendationField::FromUid, uid),
            self.query_or_empty(RecommendationField::ToUid, uid),
        );

        let mut merged: BTreeMap<RecommendationId, Recommendation> = BTreeMap::new();
        merged.extend(
            sent.into_iter()
                .chain(received)
                .map(|rec| (rec.id().clone(), rec)),
        );
        let mut recommendations: Vec<Recommendation> = merged.into_values().collect();
        // Newest first; undated documents sink to the bottom.
        recommendations.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        let counterparts = recommendations
            .iter()
            .flat_map(|rec| [rec.from_uid(), rec.to_uid()])
            .collect();
        let usernames = self.usernames_for(counterparts).await;
        let now = self.clock.utc();
        let name_of = |who: &UserId| {
            usernames
                .get(who)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_USERNAME.to_owned())
        };

        recommendations
            .into_iter()
            .map(|recommendation| FeedEntry {
                direction: if recommendation.is_sender(uid) {
                    FeedDirection::Sent
                } else {
                    FeedDirection::Received
                },
                from_username: name_of(recommendation.from_uid()),
                to_username: name_of(recommendation.to_uid()),
                relative_time: recommendation
                    .timestamp()
                    .map(|timestamp| relative_time_label(timestamp, now)),
                recommendation,
            })
            .collect()
    }

    async fn recommendation_detail(
        &self,
        id: &RecommendationId,
        viewer: &UserId,
    ) -> Option<RecommendationDetail> {
        let recommendation = match self.recommendations.find_by_id(id).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                debug!(%id, "recommendation not found");
                return None;
            }
            Err(err) => {
                warn!(%id, error = %err, "recommendation lookup failed");
                return None;
            }
        };

        let (from_username, to_username) = futures_util::join!(
            self.username_of(recommendation.from_uid()),
            self.username_of(recommendation.to_uid()),
        );
        let viewer_role = if recommendation.is_recipient(viewer) {
            ViewerRole::Recipient
        } else if recommendation.is_sender(viewer) {
            ViewerRole::Sender
        } else {
            ViewerRole::Observer
        };

        Some(RecommendationDetail {
            from_username: from_username.unwrap_or_else(|| recommendation.from_uid().to_string()),
            to_username: to_username.unwrap_or_else(|| recommendation.to_uid().to_string()),
            viewer_role,
            recommendation,
        })
    }

    async fn vote_stats(&self, uid: &UserId, role: StatsRole) -> VoteTally {
        let field = match role {
            StatsRole::Sent => RecommendationField::FromUid,
            StatsRole::Received => RecommendationField::ToUid,
        };
        let recommendations = self.query_or_empty(field, uid).await;
        compute_stats(&recommendations, uid, role)
    }
}

#[cfg(test)]
#[path = "voting_service_tests.rs"]
mod tests;
