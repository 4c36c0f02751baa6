//! Per-owner mutual exclusion for profile submissions.

use reelhub_core::config::ConcurrentSubmissionPolicy;
use reelhub_core::error::{ReelhubError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Table of locks keyed by owner id.
///
/// Submissions for different owners never contend. Entries are removed once
/// nobody holds or waits for them.
#[derive(Default)]
pub struct OwnerLocks {
    locks: LockTable,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(locks: &LockTable) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        // The table is only held for map operations that cannot panic halfway.
        locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Takes the lock of `owner_id`.
    ///
    /// With [`ConcurrentSubmissionPolicy::Reject`] a held lock fails
    /// immediately with `SubmissionInProgress`; with
    /// [`ConcurrentSubmissionPolicy::Wait`] the call waits its turn.
    pub async fn acquire(
        &self,
        owner_id: &str,
        policy: ConcurrentSubmissionPolicy,
    ) -> Result<OwnerLockGuard> {
        let lock = {
            let mut table = Self::table(&self.locks);
            table
                .entry(owner_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = match policy {
            ConcurrentSubmissionPolicy::Reject => match lock.try_lock_owned() {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::info!(
                        "[OwnerLocks] Rejecting concurrent submission for {}",
                        owner_id
                    );
                    return Err(ReelhubError::SubmissionInProgress {
                        owner_id: owner_id.to_string(),
                    });
                }
            },
            ConcurrentSubmissionPolicy::Wait => {
                tracing::debug!("[OwnerLocks] Waiting for lock of {}", owner_id);
                lock.lock_owned().await
            }
        };

        Ok(OwnerLockGuard {
            locks: self.locks.clone(),
            owner_id: owner_id.to_string(),
            guard: Some(guard),
        })
    }

    /// Returns true if a submission for `owner_id` currently holds the lock.
    pub fn is_locked(&self, owner_id: &str) -> bool {
        Self::table(&self.locks)
            .get(owner_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }
}

fn prune(locks: &LockTable, owner_id: &str) {
    let mut table = OwnerLocks::table(locks);
    if table
        .get(owner_id)
        .is_some_and(|lock| Arc::strong_count(lock) == 1)
    {
        table.remove(owner_id);
    }
}

/// Held for the lifetime of one submission.
pub struct OwnerLockGuard {
    locks: LockTable,
    owner_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl OwnerLockGuard {
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Drop for OwnerLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        prune(&self.locks, &self.owner_id);
    }
}
