//! Test utilities for the recky crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;

use crate::domain::{
    EmailAddress, Recommendation, RecommendationId, RecommendationKind, UserId, UserProfile,
    Username,
};
use crate::outbound::memory::{InMemoryDocumentStore, StoreSnapshot};

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    utc_now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock at `utc_now`.
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Instant used by fixtures: 2025-06-01T12:00:00Z.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is valid"),
    }
}

/// A [`FixedClock`] at [`fixture_now`], boxed for service constructors.
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(fixture_now()))
}

/// Parse a uid, panicking on invalid fixture input.
pub fn uid(raw: &str) -> UserId {
    match UserId::new(raw) {
        Ok(uid) => uid,
        Err(err) => panic!("invalid fixture uid {raw:?}: {err}"),
    }
}

/// A profile for `raw` with username `raw` and email `raw@example.com`.
pub fn profile(raw: &str) -> UserProfile {
    let username = match Username::new(raw) {
        Ok(username) => username,
        Err(err) => panic!("invalid fixture username {raw:?}: {err}"),
    };
    let email = match EmailAddress::new(format!("{raw}@example.com")) {
        Ok(email) => email,
        Err(err) => panic!("invalid fixture email for {raw:?}: {err}"),
    };
    UserProfile::new(uid(raw), username, email)
}

/// An unvoted recommendation from `from` to `to`.
pub fn recommendation(id: &str, from: &str, to: &str, title: &str) -> Recommendation {
    let id = match RecommendationId::new(id) {
        Ok(id) => id,
        Err(err) => panic!("invalid fixture recommendation id: {err}"),
    };
    match Recommendation::new(id, uid(from), uid(to), title, RecommendationKind::Movie) {
        Ok(recommendation) => recommendation,
        Err(err) => panic!("invalid fixture recommendation: {err}"),
    }
}

/// A store seeded with `users` and `recommendations`.
pub fn seeded_store(
    users: Vec<UserProfile>,
    recommendations: Vec<Recommendation>,
) -> Arc<InMemoryDocumentStore> {
    Arc::new(InMemoryDocumentStore::from_snapshot(StoreSnapshot {
        users,
        recommendations,
    }))
}

/// A snapshot path inside a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the path is used.
pub fn temp_store_path() -> (TempDir, Utf8PathBuf) {
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("create temp dir: {err}"),
    };
    let path = match Utf8PathBuf::from_path_buf(dir.path().join("recky-store.json")) {
        Ok(path) => path,
        Err(path) => panic!("temp path is not UTF-8: {}", path.display()),
    };
    (dir, path)
}
