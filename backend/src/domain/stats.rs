//! Vote statistics over recommendation sets.
//!
//! Percentages use truncating integer division and report `0` for an empty
//! denominator, matching what the friends list and profile screens display.

use serde::Serialize;

use super::{Recommendation, UserId, Vote};

/// Integer percentage of `part` in `total`, truncated; `0` when `total` is 0.
///
/// # Examples
/// ```
/// use recky::domain::percentage;
///
/// assert_eq!(percentage(1, 3), 33);
/// assert_eq!(percentage(2, 3), 66);
/// assert_eq!(percentage(5, 0), 0);
/// ```
pub const fn percentage(part: usize, total: usize) -> usize {
    match part.saturating_mul(100).checked_div(total) {
        Some(value) => value,
        None => 0,
    }
}

/// Which side of a recommendation the statistics are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsRole {
    /// Recommendations the perspective user sent.
    Sent,
    /// Recommendations the perspective user received.
    Received,
}

impl StatsRole {
    /// Whether `recommendation` belongs to `uid` under this role.
    pub fn includes(self, recommendation: &Recommendation, uid: &UserId) -> bool {
        match self {
            Self::Sent => recommendation.is_sender(uid),
            Self::Received => recommendation.is_recipient(uid),
        }
    }
}

/// Counts of recommendations partitioned by vote state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    /// Recommendations voted up.
    pub thumbs_up: usize,
    /// Recommendations voted down.
    pub thumbs_down: usize,
    /// Recommendations not yet voted on.
    pub no_vote: usize,
}

/// Per-bucket percentages of a [`VoteTally`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotePercentages {
    /// Share voted up.
    pub thumbs_up: usize,
    /// Share voted down.
    pub thumbs_down: usize,
    /// Share not yet voted on.
    pub no_vote: usize,
}

impl VoteTally {
    /// Count one recommendation's vote state.
    pub fn record(&mut self, vote: Option<Vote>) {
        match vote {
            Some(Vote::Up) => self.thumbs_up += 1,
            Some(Vote::Down) => self.thumbs_down += 1,
            None => self.no_vote += 1,
        }
    }

    /// Recommendations counted in any bucket.
    pub fn total(&self) -> usize {
        self.thumbs_up + self.thumbs_down + self.no_vote
    }

    /// Recommendations that carry a vote.
    pub fn voted(&self) -> usize {
        self.thumbs_up + self.thumbs_down
    }

    /// Percentages of [`Self::total`] per bucket.
    pub fn percentages(&self) -> VotePercentages {
        let total = self.total();
        VotePercentages {
            thumbs_up: percentage(self.thumbs_up, total),
            thumbs_down: percentage(self.thumbs_down, total),
            no_vote: percentage(self.no_vote, total),
        }
    }
}

/// Partition the recommendations `perspective` sent or received by vote state.
///
/// # Examples
/// ```
/// use recky::domain::{compute_stats, StatsRole, UserId, VoteTally};
///
/// let alice = UserId::new("alice").expect("uid");
/// let tally = compute_stats(&[], &alice, StatsRole::Sent);
/// assert_eq!(tally, VoteTally::default());
/// ```
pub fn compute_stats<'a, I>(recommendations: I, perspective: &UserId, role: StatsRole) -> VoteTally
where
    I: IntoIterator<Item = &'a Recommendation>,
{
    recommendations
        .into_iter()
        .filter(|rec| role.includes(rec, perspective))
        .fold(VoteTally::default(), |mut tally, rec| {
            tally.record(rec.vote());
            tally
        })
}

/// Thumbs-up ratios shown beside a friend in the friends list.
///
/// Totals count voted recommendations only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendStats {
    /// Voted-up recommendations the friend sent.
    pub sent_thumbs_up: usize,
    /// Voted recommendations the friend sent.
    pub sent_total: usize,
    /// Recommendations the friend received and voted up.
    pub received_thumbs_up: usize,
    /// Recommendations the friend received and voted on.
    pub received_total: usize,
}

impl FriendStats {
    /// How often the friend's recommendations land.
    pub fn sent_percentage(&self) -> usize {
        percentage(self.sent_thumbs_up, self.sent_total)
    }

    /// How often the friend likes what they are sent.
    pub fn received_percentage(&self) -> usize {
        percentage(self.received_thumbs_up, self.received_total)
    }
}

/// Aggregate a friend's sent and received ratios from a combined set.
pub fn aggregate_friend_stats<'a, I>(friend: &UserId, recommendations: I) -> FriendStats
where
    I: IntoIterator<Item = &'a Recommendation>,
{
    let recommendations: Vec<&Recommendation> = recommendations
        .into_iter()
        .filter(|rec| rec.involves(friend))
        .collect();
    let sent = compute_stats(recommendations.iter().copied(), friend, StatsRole::Sent);
    let received = compute_stats(recommendations.iter().copied(), friend, StatsRole::Received);

    FriendStats {
        sent_thumbs_up: sent.thumbs_up,
        sent_total: sent.voted(),
        received_thumbs_up: received.thumbs_up,
        received_total: received.voted(),
    }
}
