//! Port for the recommendation document store.

use async_trait::async_trait;

use crate::domain::{Recommendation, RecommendationField, RecommendationId, UserId, VoteUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recommendation store adapters.
    pub enum RecommendationStoreError {
        /// The store could not be reached, or the request timed out.
        Connection { message: String } =>
            "recommendation store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recommendation store query failed: {message}",
        /// An update addressed a recommendation that does not exist.
        MissingDocument { id: String } =>
            "recommendation {id} does not exist",
    }
}

/// Port for recommendation lookups and vote updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Fetch a recommendation by id.
    async fn find_by_id(
        &self,
        id: &RecommendationId,
    ) -> Result<Option<Recommendation>, RecommendationStoreError>;

    /// Return every recommendation whose `field` equals `uid`.
    async fn query_by(
        &self,
        field: RecommendationField,
        uid: &UserId,
    ) -> Result<Vec<Recommendation>, RecommendationStoreError>;

    /// Overwrite the `vote` and `voteNote` fields of one document.
    async fn update_vote(
        &self,
        id: &RecommendationId,
        update: &VoteUpdate,
    ) -> Result<(), RecommendationStoreError>;
}
