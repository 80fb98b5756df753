//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities for friend relationships
//! and recommendation voting, plus the services that implement the driving
//! ports in [`ports`]. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: domain failure payload and stable identifier.
//! - UserId / UserProfile: user identity and set-valued relationship fields.
//! - RelationshipBatch: atomic multi-document set mutations.
//! - Recommendation / Vote: recommendation documents and recipient votes.
//! - FriendshipService / RecommendationVotingService: port implementations.

pub mod ports;

mod error;
mod friendship_service;
mod recommendation;
mod relationship;
mod relative_time;
mod stats;
mod store_error_mapping;
mod user;
mod voting_service;

pub use self::error::{Error, ErrorCode};
pub use self::friendship_service::FriendshipService;
pub use self::recommendation::{
    Recommendation, RecommendationField, RecommendationId, RecommendationKind,
    RecommendationValidationError, Vote, VoteUpdate,
};
pub use self::relationship::{RelationshipBatch, SetField, SetMutation, SetOperation};
pub use self::relative_time::relative_time_label;
pub use self::stats::{
    FriendStats, StatsRole, VotePercentages, VoteTally, aggregate_friend_stats, compute_stats,
    percentage,
};
pub use self::user::{EmailAddress, UserId, UserProfile, UserValidationError, Username};
pub use self::voting_service::RecommendationVotingService;
