//! In-memory document store implementing both driven ports.
//!
//! Users and recommendations live behind a single [`RwLock`], so a
//! [`RelationshipBatch`] is validated and applied under one write guard and
//! can never be observed half-applied.

use std::collections::BTreeMap;
#[cfg(any(test, feature = "test-support"))]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{
    RecommendationStore, RecommendationStoreError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    EmailAddress, Recommendation, RecommendationField, RecommendationId, RelationshipBatch,
    SetField, SetOperation, UserId, UserProfile, VoteUpdate,
};

/// Serialisable contents of an [`InMemoryDocumentStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// User profile documents.
    #[serde(default)]
    pub users: Vec<UserProfile>,
    /// Recommendation documents.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Default)]
struct Documents {
    users: BTreeMap<UserId, UserProfile>,
    recommendations: BTreeMap<RecommendationId, Recommendation>,
}

/// Document store held entirely in process memory.
///
/// # Examples
/// ```
/// use recky::outbound::memory::{InMemoryDocumentStore, StoreSnapshot};
///
/// let store = InMemoryDocumentStore::from_snapshot(StoreSnapshot::default());
/// assert_eq!(store.snapshot().expect("readable"), StoreSnapshot::default());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Documents>,
    #[cfg(any(test, feature = "test-support"))]
    offline: AtomicBool,
}

const POISONED: &str = "document store lock poisoned";

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted documents.
    ///
    /// Later duplicates of the same uid or id replace earlier ones.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let documents = Documents {
            users: snapshot
                .users
                .into_iter()
                .map(|profile| (profile.uid.clone(), profile))
                .collect(),
            recommendations: snapshot
                .recommendations
                .into_iter()
                .map(|rec| (rec.id().clone(), rec))
                .collect(),
        };
        Self {
            documents: RwLock::new(documents),
            #[cfg(any(test, feature = "test-support"))]
            offline: AtomicBool::new(false),
        }
    }

    /// Copy every document out in uid / id order.
    pub fn snapshot(&self) -> Result<StoreSnapshot, UserDirectoryError> {
        let documents = self.read().map_err(UserDirectoryError::connection)?;
        Ok(StoreSnapshot {
            users: documents.users.values().cloned().collect(),
            recommendations: documents.recommendations.values().cloned().collect(),
        })
    }

    /// Insert or replace a user profile.
    pub fn insert_user(&self, profile: UserProfile) -> Result<(), UserDirectoryError> {
        let mut documents = self.write().map_err(UserDirectoryError::connection)?;
        documents.users.insert(profile.uid.clone(), profile);
        Ok(())
    }

    /// Insert or replace a recommendation.
    pub fn insert_recommendation(
        &self,
        recommendation: Recommendation,
    ) -> Result<(), RecommendationStoreError> {
        let mut documents = self.write().map_err(RecommendationStoreError::connection)?;
        documents
            .recommendations
            .insert(recommendation.id().clone(), recommendation);
        Ok(())
    }

    /// Simulate the backing store becoming unreachable.
    #[cfg(any(test, feature = "test-support"))]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>, &'static str> {
        self.ensure_online()?;
        self.documents.read().map_err(|_| POISONED)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>, &'static str> {
        self.ensure_online()?;
        self.documents.write().map_err(|_| POISONED)
    }

    /// Fails only while the test-support offline switch is on.
    fn ensure_online(&self) -> Result<(), &'static str> {
        #[cfg(any(test, feature = "test-support"))]
        if self.offline.load(Ordering::SeqCst) {
            return Err("document store is offline");
        }
        Ok(())
    }

    fn mutate_set(&self, operation: &SetOperation) -> Result<(), UserDirectoryError> {
        let mut documents = self.write().map_err(UserDirectoryError::connection)?;
        let profile = documents
            .users
            .get_mut(&operation.uid)
            .ok_or_else(|| UserDirectoryError::missing_document(operation.uid.as_ref()))?;
        let changed = operation.apply_to(profile);
        debug!(
            uid = %operation.uid,
            field = %operation.field,
            value = %operation.value,
            changed,
            "set field updated"
        );
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDocumentStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        let documents = self.read().map_err(UserDirectoryError::connection)?;
        Ok(documents
            .users
            .values()
            .find(|profile| &profile.email_lowercase == email)
            .cloned())
    }

    async fn find_by_id(&self, uid: &UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let documents = self.read().map_err(UserDirectoryError::connection)?;
        Ok(documents.users.get(uid).cloned())
    }

    async fn add_to_set(
        &self,
        uid: &UserId,
        field: SetField,
        value: &UserId,
    ) -> Result<(), UserDirectoryError> {
        self.mutate_set(&SetOperation::add(uid, field, value))
    }

    async fn remove_from_set(
        &self,
        uid: &UserId,
        field: SetField,
        value: &UserId,
    ) -> Result<(), UserDirectoryError> {
        self.mutate_set(&SetOperation::remove(uid, field, value))
    }

    async fn apply_batch(&self, batch: &RelationshipBatch) -> Result<(), UserDirectoryError> {
        let mut documents = self.write().map_err(UserDirectoryError::connection)?;

        // Validate before touching anything so a failing batch changes nothing.
        if let Some(missing) = batch
            .touched_documents()
            .into_iter()
            .find(|uid| !documents.users.contains_key(*uid))
        {
            return Err(UserDirectoryError::missing_document(missing.as_ref()));
        }

        let mut applied = 0_usize;
        for operation in batch.operations() {
            let Some(profile) = documents.users.get_mut(&operation.uid) else {
                return Err(UserDirectoryError::partial_write(applied, batch.len()));
            };
            operation.apply_to(profile);
            applied += 1;
        }
        debug!(operations = applied, "batch committed");
        Ok(())
    }
}

#[async_trait]
impl RecommendationStore for InMemoryDocumentStore {
    async fn find_by_id(
        &self,
        id: &RecommendationId,
    ) -> Result<Option<Recommendation>, RecommendationStoreError> {
        let documents = self.read().map_err(RecommendationStoreError::connection)?;
        Ok(documents.recommendations.get(id).cloned())
    }

    async fn query_by(
        &self,
        field: RecommendationField,
        uid: &UserId,
    ) -> Result<Vec<Recommendation>, RecommendationStoreError> {
        let documents = self.read().map_err(RecommendationStoreError::connection)?;
        Ok(documents
            .recommendations
            .values()
            .filter(|rec| match field {
                RecommendationField::FromUid => rec.from_uid() == uid,
                RecommendationField::ToUid => rec.to_uid() == uid,
            })
            .cloned()
            .collect())
    }

    async fn update_vote(
        &self,
        id: &RecommendationId,
        update: &VoteUpdate,
    ) -> Result<(), RecommendationStoreError> {
        let mut documents = self.write().map_err(RecommendationStoreError::connection)?;
        let recommendation = documents
            .recommendations
            .get_mut(id)
            .ok_or_else(|| RecommendationStoreError::missing_document(id.as_ref()))?;
        recommendation.apply_vote(update);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
