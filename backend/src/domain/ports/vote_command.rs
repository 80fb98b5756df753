//! Driving port for recipient votes.

use async_trait::async_trait;

use crate::domain::{Error, RecommendationId, UserId, Vote};

/// Domain use-case port for casting a vote on a received recommendation.
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Overwrite the vote and note on `id`.
    ///
    /// Only the recipient may vote; anyone else gets
    /// [`crate::domain::ErrorCode::Unauthorized`] and the document is left
    /// unchanged. Repeating the same vote and note is a no-op.
    async fn submit_vote(
        &self,
        id: &RecommendationId,
        caller: &UserId,
        vote: Vote,
        note: &str,
    ) -> Result<(), Error>;
}
