//! Port bundle the CLI dispatches into.
//!
//! Commands depend only on driving ports, so they can be exercised against
//! any store without touching the filesystem.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    FriendshipCommand, FriendshipQuery, RecommendationQuery, RecommendationStore, UserDirectory,
    VoteCommand,
};
use crate::domain::{FriendshipService, RecommendationVotingService};

/// Dependency bundle for CLI commands.
#[derive(Clone)]
pub struct CliState {
    pub friendships: Arc<dyn FriendshipCommand>,
    pub friendships_query: Arc<dyn FriendshipQuery>,
    pub votes: Arc<dyn VoteCommand>,
    pub recommendations_query: Arc<dyn RecommendationQuery>,
}

impl CliState {
    /// Wire the domain services over one store implementing both driven
    /// ports.
    pub fn from_store<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: UserDirectory + RecommendationStore + 'static,
    {
        let friendships = Arc::new(FriendshipService::new(Arc::clone(&store), Arc::clone(&store)));
        let voting = Arc::new(RecommendationVotingService::new(
            Arc::clone(&store),
            store,
            clock,
        ));
        Self {
            friendships: friendships.clone(),
            friendships_query: friendships,
            votes: voting.clone(),
            recommendations_query: voting,
        }
    }
}
