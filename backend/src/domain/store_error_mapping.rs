//! Shared mapping from driven-port errors to domain errors.

use tracing::error;

use super::Error;
use super::ports::{RecommendationStoreError, UserDirectoryError};

/// Map user directory failures into domain errors.
///
/// Partial writes are integrity bugs in the adapter: they are logged at
/// error level and surfaced as-is, never retried.
pub(crate) fn map_directory_error(err: UserDirectoryError) -> Error {
    match err {
        UserDirectoryError::Connection { message } => {
            Error::store_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserDirectoryError::MissingDocument { uid } => {
            Error::not_found(format!("user {uid} does not exist"))
        }
        UserDirectoryError::PartialWrite { applied, total } => {
            error!(
                applied,
                total, "relationship batch was partially applied; user documents are inconsistent"
            );
            Error::partial_write(format!(
                "relationship batch applied {applied} of {total} operations"
            ))
        }
    }
}

/// Map recommendation store failures into domain errors.
pub(crate) fn map_recommendation_error(err: RecommendationStoreError) -> Error {
    match err {
        RecommendationStoreError::Connection { message } => {
            Error::store_unavailable(format!("recommendation store unavailable: {message}"))
        }
        RecommendationStoreError::Query { message } => {
            Error::internal(format!("recommendation store error: {message}"))
        }
        RecommendationStoreError::MissingDocument { id } => {
            Error::not_found(format!("recommendation {id} does not exist"))
        }
    }
}
