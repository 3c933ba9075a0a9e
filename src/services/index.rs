use crate::models::MentorProfile;
use crate::services::appwrite::{AppwriteClient, AppwriteError};
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors raised by an index refresh
///
/// Never surfaced to an in-flight match: on failure the index keeps serving
/// the previous snapshot.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("profile source error: {0}")]
    Source(#[from] AppwriteError),
}

/// Immutable view of the eligible mentor pool at a point in time
#[derive(Debug, Clone)]
pub struct MentorSnapshot {
    pub mentors: Vec<MentorProfile>,
    pub refreshed_at: DateTime<Utc>,
}

impl MentorSnapshot {
    fn empty() -> Self {
        Self {
            mentors: Vec::new(),
            refreshed_at: Utc::now(),
        }
    }
}

/// Mentor Profile Index
///
/// Holds the current snapshot behind a single swappable reference. Readers
/// clone the `Arc` and keep computing against it even if a refresh swaps in
/// a newer snapshot mid-request; a partially-built snapshot is never
/// observable. The lock is held only for the clone or the swap, so refresh
/// never blocks matching.
pub struct MentorIndex {
    snapshot: RwLock<Arc<MentorSnapshot>>,
}

impl MentorIndex {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(MentorSnapshot::empty())),
        }
    }

    /// Latest complete snapshot
    pub fn current(&self) -> Arc<MentorSnapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            // A writer can't panic while holding this lock (the swap is a
            // plain assignment), but recover rather than propagate anyway
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Build a new snapshot from the given profiles and swap it in
    pub fn install(&self, mentors: Vec<MentorProfile>) {
        let next = Arc::new(MentorSnapshot {
            mentors,
            refreshed_at: Utc::now(),
        });
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Pull mentor documents from the profile store and swap in a fresh
    /// snapshot
    ///
    /// Idempotent and safe to run concurrently with matches and with other
    /// refreshes. On failure the previous snapshot stays live and the error
    /// is reported to the caller for logging.
    pub async fn refresh(&self, source: &AppwriteClient) -> Result<usize, RefreshError> {
        let documents = source.list_mentor_profiles().await?;

        let mentors: Vec<MentorProfile> = documents
            .into_iter()
            .map(|document| document.into_profile())
            .collect();
        let count = mentors.len();

        self.install(mentors);
        tracing::info!("Mentor index refreshed with {} profiles", count);

        Ok(count)
    }
}

impl Default for MentorIndex {
    fn default() -> Self {
        Self::new()
    }
}
