//! Atomic relationship mutations across user documents.
//!
//! Every friendship transition that touches more than one field is expressed
//! as a [`RelationshipBatch`] and handed to the user directory in a single
//! call. The directory applies the whole batch or none of it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{UserId, UserProfile};

/// Set-valued fields on a user profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetField {
    /// Confirmed friendships.
    Friends,
    /// Inbound pending requests.
    FriendRequests,
    /// Outbound pending requests.
    SentRequests,
}

impl SetField {
    /// Document field name as stored.
    pub const fn document_field(self) -> &'static str {
        match self {
            Self::Friends => "friends",
            Self::FriendRequests => "friendRequests",
            Self::SentRequests => "sentRequests",
        }
    }
}

impl fmt::Display for SetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_field())
    }
}

/// Direction of a set mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetMutation {
    /// Set-union with a single value.
    Add,
    /// Set-difference with a single value.
    Remove,
}

/// One set-add or set-remove against a single user document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    /// Document being mutated.
    pub uid: UserId,
    /// Field on that document.
    pub field: SetField,
    /// Whether `value` is added or removed.
    pub mutation: SetMutation,
    /// The uid written into or removed from the set.
    pub value: UserId,
}

impl SetOperation {
    /// Add `value` to `field` on document `uid`.
    pub fn add(uid: &UserId, field: SetField, value: &UserId) -> Self {
        Self {
            uid: uid.clone(),
            field,
            mutation: SetMutation::Add,
            value: value.clone(),
        }
    }

    /// Remove `value` from `field` on document `uid`.
    pub fn remove(uid: &UserId, field: SetField, value: &UserId) -> Self {
        Self {
            uid: uid.clone(),
            field,
            mutation: SetMutation::Remove,
            value: value.clone(),
        }
    }

    /// Apply the operation to an in-memory copy of the target document.
    ///
    /// Returns `true` when the set changed. Both mutations are idempotent.
    pub fn apply_to(&self, profile: &mut UserProfile) -> bool {
        let set = profile.set_mut(self.field);
        match self.mutation {
            SetMutation::Add => set.insert(self.value.clone()),
            SetMutation::Remove => set.remove(&self.value),
        }
    }
}

/// Ordered list of set operations submitted as one all-or-nothing unit.
///
/// # Examples
/// ```
/// use recky::domain::{RelationshipBatch, SetField, UserId};
///
/// let alice = UserId::new("alice").expect("uid");
/// let bob = UserId::new("bob").expect("uid");
/// let batch = RelationshipBatch::accept_request(&alice, &bob);
///
/// assert_eq!(batch.len(), 4);
/// assert_eq!(batch.operations()[0].field, SetField::Friends);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipBatch {
    operations: Vec<SetOperation>,
}

impl RelationshipBatch {
    /// Start an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    #[must_use]
    pub fn with(mut self, operation: SetOperation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Record a pending request from `requester` to `target` in both views.
    pub fn friend_request(requester: &UserId, target: &UserId) -> Self {
        Self::new()
            .with(SetOperation::add(target, SetField::FriendRequests, requester))
            .with(SetOperation::add(requester, SetField::SentRequests, target))
    }

    /// Confirm the friendship and clear the pending request in both views.
    pub fn accept_request(current: &UserId, sender: &UserId) -> Self {
        Self::new()
            .with(SetOperation::add(current, SetField::Friends, sender))
            .with(SetOperation::add(sender, SetField::Friends, current))
            .with(SetOperation::remove(current, SetField::FriendRequests, sender))
            .with(SetOperation::remove(sender, SetField::SentRequests, current))
    }

    /// Dissolve a confirmed friendship on both sides.
    pub fn remove_friendship(current: &UserId, friend: &UserId) -> Self {
        Self::new()
            .with(SetOperation::remove(current, SetField::Friends, friend))
            .with(SetOperation::remove(friend, SetField::Friends, current))
    }

    /// Operations in submission order.
    pub fn operations(&self) -> &[SetOperation] {
        &self.operations
    }

    /// Distinct documents the batch writes to.
    pub fn touched_documents(&self) -> BTreeSet<&UserId> {
        self.operations.iter().map(|op| &op.uid).collect()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the batch has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
