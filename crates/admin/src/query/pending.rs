//! Tracking of delete mutations that are in flight.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use roster_core::UserId;

/// Set of user ids whose delete request has been sent but not answered.
///
/// The list page renders these rows busy with their actions disabled.
#[derive(Debug, Clone, Default)]
pub struct PendingDeletes {
    ids: Arc<Mutex<HashSet<UserId>>>,
}

impl PendingDeletes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as pending until the returned guard is dropped.
    ///
    /// Returns `None` if a delete for `id` is already in flight.
    #[must_use]
    pub fn begin(&self, id: UserId) -> Option<PendingDelete> {
        let inserted = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);

        inserted.then(|| PendingDelete {
            ids: Arc::clone(&self.ids),
            id,
        })
    }

    /// Whether a delete for `id` is in flight.
    #[must_use]
    pub fn contains(&self, id: UserId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Copy of the current pending set.
    #[must_use]
    pub fn snapshot(&self) -> HashSet<UserId> {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Guard for one in-flight delete. Dropping it clears the pending mark
/// whether the delete succeeded or failed.
#[derive(Debug)]
pub struct PendingDelete {
    ids: Arc<Mutex<HashSet<UserId>>>,
    id: UserId,
}

impl PendingDelete {
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }
}

impl Drop for PendingDelete {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
