//! Submission store
//!
//! Append-only sequence of [`Submission`]s kept as one JSON array in a named
//! slot of a pluggable [`SlotBackend`]. Insertion order is submission order.
//!
//! `append` is a read-modify-write of the whole array. Appends through a
//! single `SubmissionStore` are serialized by an async mutex; two processes
//! (or two stores) sharing the same slot still race, and the last writer
//! wins.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::submission::Submission;
use crate::{Error, Result};

mod file;
mod memory;
#[cfg(feature = "sqlx")]
mod sqlite;

pub use file::FileBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "sqlx")]
pub use sqlite::SqliteBackend;

/// Default slot holding the submission array
pub const SUBMISSIONS_SLOT: &str = "tomoSubmissions";

/// Key/value persistence for whole-document slots
#[async_trait]
pub trait SlotBackend: Send + Sync {
    /// Contents of `slot`, or `None` when it has never been written
    async fn read(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of `slot`
    async fn write(&self, slot: &str, contents: &str) -> Result<()>;

    /// Short label for logs and the health endpoint
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// What `load_all` does with a slot that does not parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptDataPolicy {
    /// Surface [`Error::CorruptStore`]
    #[default]
    FailFast,
    /// Log a warning and behave as if the slot were empty
    TreatAsEmpty,
}

/// Append/read access to the persisted submissions
#[derive(Clone)]
pub struct SubmissionStore {
    backend: Arc<dyn SlotBackend>,
    slot: String,
    policy: CorruptDataPolicy,
    append_lock: Arc<Mutex<()>>,
}

impl SubmissionStore {
    /// Store over `backend` using the default slot and fail-fast policy
    pub fn new(backend: Arc<dyn SlotBackend>) -> Self {
        Self {
            backend,
            slot: SUBMISSIONS_SLOT.to_string(),
            policy: CorruptDataPolicy::default(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Ephemeral store, mainly for tests
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn with_policy(mut self, policy: CorruptDataPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn policy(&self) -> CorruptDataPolicy {
        self.policy
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// All submissions in insertion order; empty when the slot is absent
    pub async fn load_all(&self) -> Result<Vec<Submission>> {
        let Some(raw) = self.backend.read(&self.slot).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Submission>>(&raw) {
            Ok(submissions) => Ok(submissions),
            Err(e) => match self.policy {
                CorruptDataPolicy::FailFast => Err(Error::CorruptStore {
                    slot: self.slot.clone(),
                    reason: e.to_string(),
                }),
                CorruptDataPolicy::TreatAsEmpty => {
                    warn!(
                        "Slot '{}' holds malformed data ({}); treating as empty",
                        self.slot, e
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Append one submission to the end of the sequence
    pub async fn append(&self, submission: Submission) -> Result<()> {
        let _guard = self.append_lock.lock().await;

        let mut submissions = self.load_all().await?;
        let id = submission.id;
        submissions.push(submission);

        let encoded = serde_json::to_string(&submissions)?;
        self.backend.write(&self.slot, &encoded).await?;

        debug!(
            "Appended submission {} to slot '{}' ({} total)",
            id,
            self.slot,
            submissions.len()
        );
        Ok(())
    }
}

impl std::fmt::Debug for SubmissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionStore")
            .field("backend", &self.backend.name())
            .field("slot", &self.slot)
            .field("policy", &self.policy)
            .finish()
    }
}
