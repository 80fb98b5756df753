//! Port for the user profile document store.
//!
//! Adapters must implement [`UserDirectory::apply_batch`] on top of the
//! backing store's native multi-document transaction. A batch either lands
//! completely or leaves every document untouched.

use async_trait::async_trait;

use crate::domain::{EmailAddress, RelationshipBatch, SetField, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The store could not be reached, or the request timed out.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
        /// A mutation addressed a profile document that does not exist.
        MissingDocument { uid: String } =>
            "user document {uid} does not exist",
        /// The store reports that only part of a batch was applied.
        PartialWrite { applied: usize, total: usize } =>
            "relationship batch applied {applied} of {total} operations",
    }
}

/// Port for user profile lookups and set-valued field mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the profile whose normalised email matches `email`.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Fetch a profile by uid.
    async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Add `value` to a set-valued field of a single document.
    async fn add_to_set(
        &self,
        uid: &UserId,
        field: SetField,
        value: &UserId,
    ) -> Result<(), UserDirectoryError>;

    /// Remove `value` from a set-valued field of a single document.
    async fn remove_from_set(
        &self,
        uid: &UserId,
        field: SetField,
        value: &UserId,
    ) -> Result<(), UserDirectoryError>;

    /// Apply every operation in `batch` atomically.
    ///
    /// A missing target document fails the whole batch with
    /// [`UserDirectoryError::MissingDocument`] before anything is written.
    async fn apply_batch(&self, batch: &RelationshipBatch) -> Result<(), UserDirectoryError>;
}
