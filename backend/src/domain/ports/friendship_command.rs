//! Driving port for friend request and friendship mutations.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, UserId};

/// Result of a friend request that did not fail.
///
/// Every variant counts as success from the caller's point of view. Only
/// [`FriendRequestOutcome::Sent`] changes any document; the others describe
/// why the request was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestOutcome {
    /// The request was recorded on both profiles.
    Sent,
    /// No user is registered under the given email.
    RecipientNotFound,
    /// The email belongs to the requester.
    SelfRequest,
    /// The two users are already friends.
    AlreadyFriends,
    /// An identical request is already pending.
    AlreadyRequested,
}

impl FriendRequestOutcome {
    /// Whether any document was written.
    pub fn changed_state(self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Domain use-case port for friendship state transitions.
///
/// Write failures are always returned as errors, never reported as success.
#[async_trait]
pub trait FriendshipCommand: Send + Sync {
    /// Send a request from `requester` to the user registered under
    /// `target_email`.
    async fn send_request(
        &self,
        requester: &UserId,
        target_email: &str,
    ) -> Result<FriendRequestOutcome, Error>;

    /// Accept the pending request `sender` addressed to `current`.
    async fn accept_request(&self, current: &UserId, sender: &UserId) -> Result<(), Error>;

    /// Drop the pending request `sender` addressed to `current`.
    async fn ignore_request(&self, current: &UserId, sender: &UserId) -> Result<(), Error>;

    /// End the friendship between `current` and `friend` on both sides.
    async fn remove_friend(&self, current: &UserId, friend: &UserId) -> Result<(), Error>;
}
