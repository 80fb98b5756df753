//! Driving port for recommendation read models.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Recommendation, RecommendationId, StatsRole, UserId, VoteTally};

/// Fallback shown when a counterpart's profile cannot be resolved.
pub const UNKNOWN_USERNAME: &str = "unknown";

/// Which way a feed entry travelled relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedDirection {
    /// The viewer sent it.
    Sent,
    /// The viewer received it.
    Received,
}

/// One card in the recommendation feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    /// The underlying document.
    pub recommendation: Recommendation,
    /// Direction relative to the viewer.
    pub direction: FeedDirection,
    /// Sender display name, or [`UNKNOWN_USERNAME`].
    pub from_username: String,
    /// Recipient display name, or [`UNKNOWN_USERNAME`].
    pub to_username: String,
    /// Relative creation time; `None` when the document has no timestamp.
    pub relative_time: Option<String>,
}

impl FeedEntry {
    /// `to @name` for sent entries, `from @name` for received ones.
    pub fn headline(&self) -> String {
        match self.direction {
            FeedDirection::Sent => format!("to @{}", self.to_username),
            FeedDirection::Received => format!("from @{}", self.from_username),
        }
    }
}

/// How the viewer relates to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    /// The viewer received it and may vote.
    Recipient,
    /// The viewer sent it.
    Sender,
    /// The viewer is neither party.
    Observer,
}

/// Detail view of a single recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDetail {
    /// The underlying document.
    pub recommendation: Recommendation,
    /// Sender display name, or the raw uid when unresolved.
    pub from_username: String,
    /// Recipient display name, or the raw uid when unresolved.
    pub to_username: String,
    /// The viewer's relation to the document.
    pub viewer_role: ViewerRole,
}

impl RecommendationDetail {
    /// Whether the viewer may submit a vote.
    pub fn can_vote(&self) -> bool {
        self.viewer_role == ViewerRole::Recipient
    }
}

/// Domain use-case port for recommendation reads.
///
/// Store errors degrade to empty results.
#[async_trait]
pub trait RecommendationQuery: Send + Sync {
    /// Recommendations sent by or to `uid`, newest first.
    async fn load_feed(&self, uid: &UserId) -> Vec<FeedEntry>;

    /// A single recommendation as seen by `viewer`.
    async fn recommendation_detail(
        &self,
        id: &RecommendationId,
        viewer: &UserId,
    ) -> Option<RecommendationDetail>;

    /// Vote tally over what `uid` sent or received.
    async fn vote_stats(&self, uid: &UserId, role: StatsRole) -> VoteTally;
}
