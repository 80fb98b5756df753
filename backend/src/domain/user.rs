//! User profile documents.
//!
//! A profile carries three uid sets that together encode the friendship
//! graph:
//! - `friends` holds confirmed friendships and is symmetric across the two
//!   documents involved.
//! - `friendRequests` lists inbound pending requests (the senders).
//! - `sentRequests` lists outbound pending requests (the recipients).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::relationship::SetField;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The uid was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The uid carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    PaddedId,
    /// The email address was blank.
    #[error("email address must not be empty")]
    EmptyEmail,
    /// The email address has no `@` separator.
    #[error("email address must contain '@'")]
    MalformedEmail,
    /// The username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Opaque, stable user identifier issued by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use recky::domain::UserId;
    ///
    /// let uid = UserId::new("kq2X9aLm").expect("valid uid");
    /// assert_eq!(uid.as_ref(), "kq2X9aLm");
    /// assert!(UserId::new(" padded ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address used as the friend-search lookup key.
///
/// Input is trimmed and lowercased, so `" Ada@Example.COM "` and
/// `"ada@example.com"` address the same user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    ///
    /// # Examples
    /// ```
    /// use recky::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !normalised.contains('@') {
            return Err(UserValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name shown in friend lists and recommendation cards.
///
/// Uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// User profile document.
///
/// ## Invariants
/// - `a ∈ b.friends ⇔ b ∈ a.friends` for confirmed friendships. Only
///   relationship batches touching both documents may change `friends`.
/// - `sentRequests` mirrors another user's `friendRequests` entry, but may go
///   stale when that user ignores the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Primary key.
    pub uid: UserId,
    /// Display name.
    pub username: Username,
    /// Normalised lookup key for friend search.
    pub email_lowercase: EmailAddress,
    /// Confirmed friends.
    #[serde(default)]
    pub friends: BTreeSet<UserId>,
    /// Senders of inbound pending requests.
    #[serde(default)]
    pub friend_requests: BTreeSet<UserId>,
    /// Recipients of outbound pending requests.
    #[serde(default)]
    pub sent_requests: BTreeSet<UserId>,
}

impl UserProfile {
    /// Construct a profile with no relationships, as created at signup.
    pub fn new(uid: UserId, username: Username, email_lowercase: EmailAddress) -> Self {
        Self {
            uid,
            username,
            email_lowercase,
            friends: BTreeSet::new(),
            friend_requests: BTreeSet::new(),
            sent_requests: BTreeSet::new(),
        }
    }

    /// Whether `other` is a confirmed friend.
    pub fn is_friend(&self, other: &UserId) -> bool {
        self.friends.contains(other)
    }

    /// Whether `sender` has a pending request addressed to this user.
    pub fn has_request_from(&self, sender: &UserId) -> bool {
        self.friend_requests.contains(sender)
    }

    /// Whether this user has an outbound request recorded for `target`.
    pub fn has_sent_request_to(&self, target: &UserId) -> bool {
        self.sent_requests.contains(target)
    }

    /// Number of inbound pending requests.
    pub fn pending_request_count(&self) -> usize {
        self.friend_requests.len()
    }

    /// Mutably borrow the uid set backing `field`.
    pub fn set_mut(&mut self, field: SetField) -> &mut BTreeSet<UserId> {
        match field {
            SetField::Friends => &mut self.friends,
            SetField::FriendRequests => &mut self.friend_requests,
            SetField::SentRequests => &mut self.sent_requests,
        }
    }
}
