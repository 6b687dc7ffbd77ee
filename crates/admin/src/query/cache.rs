//! Cache types for store query results.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use roster_core::{User, UserId};

/// Cache key for user queries.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum QueryKey {
    /// The full user list.
    Users,
    /// A single record by id.
    User(UserId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum QueryValue {
    Users(Arc<Vec<User>>),
    /// `None` records a confirmed absence.
    User(Option<Box<User>>),
}

/// A cached value stamped with the key's generation at the moment its fetch
/// started.
#[derive(Debug, Clone)]
pub(super) struct CachedEntry {
    pub generation: u64,
    pub value: QueryValue,
}

/// Invalidation counters.
///
/// A key's generation is the sum of a global counter (bumped by
/// `invalidate_all`) and its own counter (bumped when the key is
/// invalidated). Both only grow, so the sum changes whenever either does.
#[derive(Debug, Default)]
pub(super) struct Generations {
    all: u64,
    keys: HashMap<QueryKey, u64>,
}

impl Generations {
    fn current(&self, key: QueryKey) -> u64 {
        self.all
            .wrapping_add(self.keys.get(&key).copied().unwrap_or_default())
    }
}

/// Shared [`Generations`] behind a lock that is never held across an await.
#[derive(Debug, Default)]
pub(super) struct GenerationTracker(Mutex<Generations>);

impl GenerationTracker {
    pub fn current(&self, key: QueryKey) -> u64 {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current(key)
    }

    pub fn bump(&self, keys: &[QueryKey]) {
        let mut generations = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            let counter = generations.keys.entry(*key).or_default();
            *counter = counter.wrapping_add(1);
        }
    }

    pub fn bump_all(&self) {
        let mut generations = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        generations.all = generations.all.wrapping_add(1);
    }
}
