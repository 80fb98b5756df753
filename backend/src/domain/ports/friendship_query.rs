//! Driving port for friendship read models.
//!
//! Reads never fail from the caller's perspective: store errors degrade to
//! zero counts and empty lists, so screens show "no data" instead of an
//! error.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{FriendStats, UserId, Username};

/// A pending inbound request, resolved to the sender's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendRequestSummary {
    /// Sender uid.
    pub uid: UserId,
    /// Sender display name.
    pub username: Username,
}

/// A confirmed friend with their recommendation ratios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendSummary {
    /// Friend uid.
    pub uid: UserId,
    /// Friend display name.
    pub username: Username,
    /// Sent and received thumbs-up ratios.
    pub stats: FriendStats,
}

/// Domain use-case port for friendship reads.
#[async_trait]
pub trait FriendshipQuery: Send + Sync {
    /// Number of inbound pending requests; `0` when signed out or missing.
    async fn count_pending_requests(&self, caller: Option<&UserId>) -> usize;

    /// Pending inbound requests with sender names.
    async fn list_friend_requests(&self, uid: &UserId) -> Vec<FriendRequestSummary>;

    /// Confirmed friends with their ratios.
    async fn list_friends(&self, uid: &UserId) -> Vec<FriendSummary>;
}
