//! Recommendation documents and the recipient's vote on them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Validation errors returned by the recommendation constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationValidationError {
    /// The document id was empty or padded.
    #[error("recommendation id must be non-empty without surrounding whitespace")]
    InvalidId,
    /// Sender and recipient are the same user.
    #[error("a recommendation cannot be sent to its own author")]
    SelfAddressed,
}

/// Opaque recommendation document identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecommendationId(String);

impl RecommendationId {
    /// Validate and construct a [`RecommendationId`].
    pub fn new(id: impl Into<String>) -> Result<Self, RecommendationValidationError> {
        let id = id.into();
        if id.is_empty() || id.trim() != id {
            return Err(RecommendationValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for RecommendationId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RecommendationId> for String {
    fn from(value: RecommendationId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecommendationId {
    type Error = RecommendationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Recipient judgement on a recommendation.
///
/// Stored as the boolean `vote` field; an absent field means unvoted, which
/// is modelled as `Option<Vote>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Vote {
    /// Thumbs up.
    Up,
    /// Thumbs down.
    Down,
}

impl Vote {
    /// Glyph shown next to a voted recommendation.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Up => "👍",
            Self::Down => "👎",
        }
    }
}

impl From<bool> for Vote {
    fn from(value: bool) -> Self {
        if value { Self::Up } else { Self::Down }
    }
}

impl From<Vote> for bool {
    fn from(value: Vote) -> Self {
        matches!(value, Vote::Up)
    }
}

/// Category parsed from the free-form `type` field.
///
/// Documents keep the raw label; this enum is derived from it on read and
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecommendationKind {
    /// Films.
    Movie,
    /// Books.
    Book,
    /// Television series.
    Tv,
    /// Albums and other music.
    Music,
    /// Video and board games.
    Game,
    /// Anything else; keeps the raw value.
    Other(String),
}

impl RecommendationKind {
    /// Parse a type label case-insensitively.
    ///
    /// # Examples
    /// ```
    /// use recky::domain::RecommendationKind;
    ///
    /// assert_eq!(RecommendationKind::parse("Album"), RecommendationKind::Music);
    /// assert_eq!(RecommendationKind::parse("podcast").glyph(), "❓");
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "movie" => Self::Movie,
            "book" => Self::Book,
            "tv" => Self::Tv,
            "album" | "music" => Self::Music,
            "game" => Self::Game,
            _ => Self::Other(raw.to_owned()),
        }
    }

    /// Glyph shown on recommendation cards.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Movie => "🎬",
            Self::Book => "📚",
            Self::Tv => "📺",
            Self::Music => "🎵",
            Self::Game => "🎮",
            Self::Other(_) => "❓",
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Book => f.write_str("book"),
            Self::Tv => f.write_str("tv"),
            Self::Music => f.write_str("music"),
            Self::Game => f.write_str("game"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl From<RecommendationKind> for String {
    fn from(value: RecommendationKind) -> Self {
        value.to_string()
    }
}

/// Fields a recommendation can be queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecommendationField {
    /// The `fromUID` field.
    FromUid,
    /// The `toUID` field.
    ToUid,
}

impl RecommendationField {
    /// Document field name as stored.
    pub const fn document_field(self) -> &'static str {
        match self {
            Self::FromUid => "fromUID",
            Self::ToUid => "toUID",
        }
    }
}

/// The two mutable fields a recipient writes when voting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteUpdate {
    /// New vote value.
    pub vote: Vote,
    /// New note; `None` clears the stored note.
    pub note: Option<String>,
}

impl VoteUpdate {
    /// Build an update, trimming the note and treating blank notes as absent.
    ///
    /// # Examples
    /// ```
    /// use recky::domain::{Vote, VoteUpdate};
    ///
    /// assert_eq!(VoteUpdate::new(Vote::Up, "  loved it ").note.as_deref(), Some("loved it"));
    /// assert_eq!(VoteUpdate::new(Vote::Down, "   ").note, None);
    /// ```
    pub fn new(vote: Vote, note: &str) -> Self {
        let trimmed = note.trim();
        Self {
            vote,
            note: (!trimmed.is_empty()).then(|| trimmed.to_owned()),
        }
    }
}

/// A recommendation sent from one user to another.
///
/// ## Invariants
/// - `from_uid != to_uid`.
/// - Content fields (`title`, `type`, `notes`, `timestamp`) never change
///   after creation; only [`Recommendation::apply_vote`] mutates the
///   document. The `type` label round-trips exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecommendationDocument", into = "RecommendationDocument")]
pub struct Recommendation {
    id: RecommendationId,
    from_uid: UserId,
    to_uid: UserId,
    title: String,
    kind_label: String,
    vote: Option<Vote>,
    vote_note: Option<String>,
    notes: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    has_been_viewed_by_recipient: bool,
}

impl Recommendation {
    /// Construct an unvoted recommendation.
    ///
    /// `kind` accepts either a raw `type` label or a [`RecommendationKind`].
    pub fn new(
        id: RecommendationId,
        from_uid: UserId,
        to_uid: UserId,
        title: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, RecommendationValidationError> {
        if from_uid == to_uid {
            return Err(RecommendationValidationError::SelfAddressed);
        }
        Ok(Self {
            id,
            from_uid,
            to_uid,
            title: title.into(),
            kind_label: kind.into(),
            vote: None,
            vote_note: None,
            notes: None,
            timestamp: None,
            has_been_viewed_by_recipient: false,
        })
    }

    /// Attach the sender's notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Attach the creation time.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Seed a vote, as loaded from an existing document.
    #[must_use]
    pub fn with_vote(mut self, vote: Option<Vote>) -> Self {
        self.vote = vote;
        self
    }

    /// Document id.
    pub fn id(&self) -> &RecommendationId {
        &self.id
    }

    /// Sender.
    pub fn from_uid(&self) -> &UserId {
        &self.from_uid
    }

    /// Recipient.
    pub fn to_uid(&self) -> &UserId {
        &self.to_uid
    }

    /// Recommended item title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Item category parsed from the stored label.
    pub fn kind(&self) -> RecommendationKind {
        RecommendationKind::parse(&self.kind_label)
    }

    /// The `type` label exactly as stored.
    pub fn kind_label(&self) -> &str {
        self.kind_label.as_str()
    }

    /// Recipient's vote, if cast.
    pub fn vote(&self) -> Option<Vote> {
        self.vote
    }

    /// Recipient's note on the vote.
    pub fn vote_note(&self) -> Option<&str> {
        self.vote_note.as_deref()
    }

    /// Sender's notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Creation time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Whether the recipient has opened the recommendation.
    pub fn has_been_viewed_by_recipient(&self) -> bool {
        self.has_been_viewed_by_recipient
    }

    /// Whether `uid` sent this recommendation.
    pub fn is_sender(&self, uid: &UserId) -> bool {
        &self.from_uid == uid
    }

    /// Whether `uid` received this recommendation.
    pub fn is_recipient(&self, uid: &UserId) -> bool {
        &self.to_uid == uid
    }

    /// Whether `uid` is either party.
    pub fn involves(&self, uid: &UserId) -> bool {
        self.is_sender(uid) || self.is_recipient(uid)
    }

    /// Overwrite the vote and note fields.
    pub fn apply_vote(&mut self, update: &VoteUpdate) {
        self.vote = Some(update.vote);
        self.vote_note = update.note.clone();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationDocument {
    id: RecommendationId,
    #[serde(rename = "fromUID")]
    from_uid: UserId,
    #[serde(rename = "toUID")]
    to_uid: UserId,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    vote: Option<Vote>,
    #[serde(default)]
    vote_note: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    has_been_viewed_by_recipient: bool,
}

impl From<Recommendation> for RecommendationDocument {
    fn from(value: Recommendation) -> Self {
        Self {
            id: value.id,
            from_uid: value.from_uid,
            to_uid: value.to_uid,
            title: value.title,
            kind: value.kind_label,
            vote: value.vote,
            vote_note: value.vote_note,
            notes: value.notes,
            timestamp: value.timestamp,
            has_been_viewed_by_recipient: value.has_been_viewed_by_recipient,
        }
    }
}

impl TryFrom<RecommendationDocument> for Recommendation {
    type Error = RecommendationValidationError;

    fn try_from(value: RecommendationDocument) -> Result<Self, Self::Error> {
        let RecommendationDocument {
            id,
            from_uid,
            to_uid,
            title,
            kind,
            vote,
            vote_note,
            notes,
            timestamp,
            has_been_viewed_by_recipient,
        } = value;

        let mut recommendation = Recommendation::new(id, from_uid, to_uid, title, kind)?;
        recommendation.vote = vote;
        recommendation.vote_note = vote_note;
        recommendation.notes = notes;
        recommendation.timestamp = timestamp;
        recommendation.has_been_viewed_by_recipient = has_been_viewed_by_recipient;
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn uid(raw: &str) -> UserId {
        UserId::new(raw).expect("valid uid")
    }

    #[rstest]
    fn rejects_self_addressed_recommendations() {
        let result = Recommendation::new(
            RecommendationId::new("rec-1").expect("id"),
            uid("alice"),
            uid("alice"),
            "Dune",
            RecommendationKind::Book,
        );
        assert_eq!(result, Err(RecommendationValidationError::SelfAddressed));
    }

    #[rstest]
    #[case("")]
    #[case(" rec")]
    fn rejects_invalid_ids(#[case] raw: &str) {
        assert_eq!(
            RecommendationId::new(raw),
            Err(RecommendationValidationError::InvalidId)
        );
    }

    #[rstest]
    #[case("movie", RecommendationKind::Movie, "🎬")]
    #[case("BOOK", RecommendationKind::Book, "📚")]
    #[case("tv", RecommendationKind::Tv, "📺")]
    #[case("music", RecommendationKind::Music, "🎵")]
    #[case("Game", RecommendationKind::Game, "🎮")]
    fn parses_known_kinds(
        #[case] raw: &str,
        #[case] expected: RecommendationKind,
        #[case] glyph: &str,
    ) {
        let kind = RecommendationKind::parse(raw);
        assert_eq!(kind, expected);
        assert_eq!(kind.glyph(), glyph);
    }

    #[rstest]
    fn deserialises_document_with_tri_state_vote() {
        let voted = json!({
            "id": "rec-1",
            "fromUID": "alice",
            "toUID": "bob",
            "title": "Arrival",
            "type": "movie",
            "vote": false,
            "voteNote": "too slow",
            "timestamp": "2025-05-01T12:00:00Z"
        });
        let unvoted = json!({
            "id": "rec-2",
            "fromUID": "alice",
            "toUID": "bob",
            "title": "Hades",
            "type": "game"
        });

        let voted: Recommendation = serde_json::from_value(voted).expect("valid document");
        let unvoted: Recommendation = serde_json::from_value(unvoted).expect("valid document");

        assert_eq!(voted.vote(), Some(Vote::Down));
        assert_eq!(voted.vote_note(), Some("too slow"));
        assert!(voted.timestamp().is_some());
        assert_eq!(unvoted.vote(), None);
        assert!(!unvoted.has_been_viewed_by_recipient());
    }

    #[rstest]
    fn type_label_round_trips_verbatim_after_a_vote() {
        let payload = json!({
            "id": "rec-6",
            "fromUID": "alice",
            "toUID": "bob",
            "title": "Blue",
            "type": "Album"
        });
        let mut rec: Recommendation = serde_json::from_value(payload).expect("valid document");

        rec.apply_vote(&VoteUpdate::new(Vote::Up, "on repeat"));

        assert_eq!(rec.kind(), RecommendationKind::Music);
        assert_eq!(rec.kind_label(), "Album");
        let value = serde_json::to_value(&rec).expect("serialise");
        assert_eq!(value["type"], "Album");
        assert_eq!(value["voteNote"], "on repeat");
    }

    #[rstest]
    fn deserialisation_enforces_distinct_parties() {
        let payload = json!({
            "id": "rec-3",
            "fromUID": "alice",
            "toUID": "alice",
            "title": "Echo",
            "type": "album"
        });
        assert!(serde_json::from_value::<Recommendation>(payload).is_err());
    }

    #[rstest]
    fn serialises_with_document_field_names() {
        let rec = Recommendation::new(
            RecommendationId::new("rec-4").expect("id"),
            uid("alice"),
            uid("bob"),
            "Severance",
            RecommendationKind::Tv,
        )
        .expect("valid recommendation")
        .with_vote(Some(Vote::Up));

        let value = serde_json::to_value(&rec).expect("serialise");
        assert_eq!(value["fromUID"], "alice");
        assert_eq!(value["toUID"], "bob");
        assert_eq!(value["type"], "tv");
        assert_eq!(value["vote"], true);
    }

    #[rstest]
    fn apply_vote_overwrites_both_fields() {
        let mut rec = Recommendation::new(
            RecommendationId::new("rec-5").expect("id"),
            uid("alice"),
            uid("bob"),
            "Piranesi",
            RecommendationKind::Book,
        )
        .expect("valid recommendation");

        rec.apply_vote(&VoteUpdate::new(Vote::Up, "great"));
        rec.apply_vote(&VoteUpdate::new(Vote::Down, ""));

        assert_eq!(rec.vote(), Some(Vote::Down));
        assert_eq!(rec.vote_note(), None);
        assert!(rec.is_recipient(&uid("bob")));
        assert!(rec.involves(&uid("alice")));
        assert!(!rec.involves(&uid("carol")));
    }
}
