//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserDirectory`], [`RecommendationStore`]) describe the
//! document store the services depend on. Driving ports
//! ([`FriendshipCommand`], [`FriendshipQuery`], [`VoteCommand`],
//! [`RecommendationQuery`]) describe what inbound adapters may ask of the
//! domain.

mod macros;
pub(crate) use macros::define_port_error;

mod friendship_command;
mod friendship_query;
mod recommendation_query;
mod recommendation_store;
mod user_directory;
mod vote_command;

pub use friendship_command::{FriendRequestOutcome, FriendshipCommand};
pub use friendship_query::{FriendRequestSummary, FriendSummary, FriendshipQuery};
pub use recommendation_query::{
    FeedDirection, FeedEntry, RecommendationDetail, RecommendationQuery, UNKNOWN_USERNAME,
    ViewerRole,
};
#[cfg(test)]
pub use recommendation_store::MockRecommendationStore;
pub use recommendation_store::{RecommendationStore, RecommendationStoreError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
pub use vote_command::VoteCommand;
