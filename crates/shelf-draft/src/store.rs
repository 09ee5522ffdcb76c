//! Debounced draft persistence for one wizard instance.
//!
//! ```text
//! edit ─► schedule() ─► (debounce) ─► write
//! edit ─► schedule() ─┘  a newer schedule aborts the older timer
//! step change / teardown ─► write() / flush()   bypasses the timer
//! submit ok / discard    ─► clear()             no timer may write afterwards
//! ```
//!
//! Every write, schedule and clear bumps a shared generation counter under a
//! mutex. A timer only writes if the generation it captured is still current,
//! so an older snapshot can never land on top of a newer one or resurrect a
//! cleared draft.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use shelf_core::{DraftRecord, FormState, StepId};
use tokio::task::JoinHandle;

use crate::key::DraftKey;
use crate::storage::DraftStorage;

/// Reference debounce delay.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
/// Reference staleness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

struct Pending {
    handle: JoinHandle<()>,
    data: FormState,
    step: StepId,
}

/// Autosave pipeline bound to a single draft key.
pub struct DraftStore {
    storage: Arc<dyn DraftStorage>,
    key: DraftKey,
    debounce: Duration,
    ttl: chrono::Duration,
    generation: Arc<Mutex<u64>>,
    pending: Option<Pending>,
}

impl DraftStore {
    #[must_use]
    pub fn new(storage: Arc<dyn DraftStorage>, key: DraftKey) -> Self {
        Self {
            storage,
            key,
            debounce: DEFAULT_DEBOUNCE,
            ttl: to_chrono(DEFAULT_TTL),
            generation: Arc::new(Mutex::new(0)),
            pending: None,
        }
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = to_chrono(ttl);
        self
    }

    #[must_use]
    pub const fn key(&self) -> &DraftKey {
        &self.key
    }

    /// Whether a scheduled write has not fired yet.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.handle.is_finished())
    }

    /// Coalescing autosave: replace any outstanding timer with a new one that
    /// writes `data` after the debounce delay.
    ///
    /// Outside a tokio runtime there is no timer to arm, so the snapshot is
    /// written immediately.
    pub fn schedule(&mut self, data: &FormState, step: StepId) {
        self.cancel_pending();

        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!(key = %self.key, "no runtime for debounce timer; writing now");
            self.write(data, step);
            return;
        }

        let generation = bump(&self.generation);
        let storage = Arc::clone(&self.storage);
        let guard = Arc::clone(&self.generation);
        let key = self.key.to_string();
        let delay = self.debounce;
        let snapshot = data.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let current = lock(&guard);
            if *current == generation {
                persist(storage.as_ref(), &key, &DraftRecord::new(snapshot, step));
            }
        });

        self.pending = Some(Pending {
            handle,
            data: data.clone(),
            step,
        });
    }

    /// Persist `{data, step, saved_at: now}` right away, superseding any
    /// scheduled write. Failures are logged, never returned.
    pub fn write(&mut self, data: &FormState, step: StepId) {
        self.cancel_pending();
        let mut current = lock(&self.generation);
        *current += 1;
        persist(
            self.storage.as_ref(),
            &self.key.to_string(),
            &DraftRecord::new(data.clone(), step),
        );
    }

    /// Write a scheduled snapshot now instead of waiting for its timer.
    ///
    /// Returns `true` if there was an unfired snapshot to write.
    pub fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if pending.handle.is_finished() {
            return false;
        }
        pending.handle.abort();
        self.write(&pending.data, pending.step);
        true
    }

    /// Load the draft if one exists and is within the TTL.
    ///
    /// Stale or unreadable entries are deleted as a side effect.
    #[must_use]
    pub fn read(&self) -> Option<DraftRecord> {
        let key = self.key.to_string();
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(%key, %error, "draft read failed");
                return None;
            }
        };

        let record: DraftRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%key, %error, "discarding unreadable draft");
                self.delete_quietly(&key);
                return None;
            }
        };

        if record.is_stale(Utc::now(), self.ttl) {
            tracing::debug!(%key, saved_at = %record.saved_at, "discarding stale draft");
            self.delete_quietly(&key);
            return None;
        }

        Some(record)
    }

    /// Drop any pending timer and remove the stored draft.
    pub fn clear(&mut self) {
        self.cancel_pending();
        let key = self.key.to_string();
        let mut current = lock(&self.generation);
        *current += 1;
        self.delete_quietly(&key);
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }

    fn delete_quietly(&self, key: &str) {
        if let Err(error) = self.storage.delete(key) {
            tracing::warn!(%key, %error, "draft delete failed");
        }
    }
}

impl Drop for DraftStore {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("key", &self.key)
            .field("debounce", &self.debounce)
            .field("ttl", &self.ttl)
            .field("pending", &self.has_pending())
            .finish_non_exhaustive()
    }
}

fn persist(storage: &dyn DraftStorage, key: &str, record: &DraftRecord) -> bool {
    let raw = match serde_json::to_string(record) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(%key, %error, "draft serialization failed");
            return false;
        }
    };
    match storage.set(key, &raw) {
        Ok(()) => {
            tracing::trace!(%key, step = %record.step, "draft saved");
            true
        }
        Err(error) => {
            tracing::warn!(%key, %error, "draft write failed");
            false
        }
    }
}

fn lock(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation.lock().unwrap_or_else(PoisonError::into_inner)
}

fn bump(generation: &Mutex<u64>) -> u64 {
    let mut current = lock(generation);
    *current += 1;
    *current
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}
