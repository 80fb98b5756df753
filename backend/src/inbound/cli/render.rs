//! Plain-text rendering of domain read models.

use crate::domain::ports::{FeedEntry, FriendRequestSummary, FriendSummary, RecommendationDetail};
use crate::domain::{Recommendation, VoteTally};

fn vote_glyph(recommendation: &Recommendation) -> &'static str {
    recommendation.vote().map_or("·", |vote| vote.glyph())
}

pub(super) fn friend_request_line(request: &FriendRequestSummary) -> String {
    format!("@{} ({})", request.username, request.uid)
}

pub(super) fn friend_line(friend: &FriendSummary) -> String {
    let stats = friend.stats;
    format!(
        "@{} ({})  sent 👍 {}% of {}  received 👍 {}% of {}",
        friend.username,
        friend.uid,
        stats.sent_percentage(),
        stats.sent_total,
        stats.received_percentage(),
        stats.received_total,
    )
}

pub(super) fn feed_line(entry: &FeedEntry) -> String {
    let recommendation = &entry.recommendation;
    format!(
        "[{}] {} {}  {}  {}  {}",
        recommendation.id(),
        recommendation.kind().glyph(),
        recommendation.title(),
        entry.headline(),
        entry.relative_time.as_deref().unwrap_or("-"),
        vote_glyph(recommendation),
    )
}

pub(super) fn detail_lines(detail: &RecommendationDetail) -> Vec<String> {
    let recommendation = &detail.recommendation;
    let mut lines = vec![
        format!(
            "{} {} ({})",
            recommendation.kind().glyph(),
            recommendation.title(),
            recommendation.kind_label()
        ),
        format!("from @{} to @{}", detail.from_username, detail.to_username),
    ];
    if let Some(notes) = recommendation.notes() {
        lines.push(format!("notes: {notes}"));
    }
    lines.push(format!("vote: {}", vote_glyph(recommendation)));
    if let Some(note) = recommendation.vote_note() {
        lines.push(format!("vote note: {note}"));
    }
    if detail.can_vote() {
        lines.push("you can vote on this recommendation".to_owned());
    }
    lines
}

pub(super) fn tally_lines(tally: &VoteTally) -> Vec<String> {
    let percentages = tally.percentages();
    vec![
        format!("👍 {} ({}%)", tally.thumbs_up, percentages.thumbs_up),
        format!("👎 {} ({}%)", tally.thumbs_down, percentages.thumbs_down),
        format!("no vote {} ({}%)", tally.no_vote, percentages.no_vote),
    ]
}
