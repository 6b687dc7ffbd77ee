//! Cached queries and mutations over the user store.
//!
//! Reads go through a `moka` cache keyed by [`QueryKey`]. Concurrent reads of
//! the same key share one store request, and only successful results are
//! kept. Mutations invalidate the keys they affect once the store confirms
//! them; a failed mutation leaves the cache untouched.
//!
//! Entries have no time-based expiry. They live until a mutation or an
//! explicit refresh invalidates them, or until capacity evicts them.
//!
//! Invalidation does not cancel a fetch already in flight, so every entry is
//! stamped with its key's generation when the fetch starts. An entry whose
//! stamp is older than the key's current generation was loaded before an
//! invalidation; it is dropped and fetched again.

mod cache;
mod pending;

use cache::{CachedEntry, GenerationTracker};
pub use cache::{QueryKey, QueryValue};
pub use pending::{PendingDelete, PendingDeletes};

use std::sync::Arc;

use moka::future::Cache;
use roster_core::{User, UserFormData, UserId};
use tracing::{debug, info, instrument};

use crate::store::{StoreError, UserStoreClient};

/// Cached access to the user store.
#[derive(Clone)]
pub struct UserQueries {
    inner: Arc<UserQueriesInner>,
}

struct UserQueriesInner {
    store: UserStoreClient,
    cache: Cache<QueryKey, CachedEntry>,
    generations: GenerationTracker,
    pending_deletes: PendingDeletes,
}

/// Refetch attempts before a result is returned even though an invalidation
/// raced it.
const MAX_FETCH_ATTEMPTS: usize = 3;

impl UserQueries {
    /// Wrap a store client with a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(store: UserStoreClient, capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(capacity).build();

        Self {
            inner: Arc::new(UserQueriesInner {
                store,
                cache,
                generations: GenerationTracker::default(),
                pending_deletes: PendingDeletes::new(),
            }),
        }
    }

    /// The underlying store client.
    #[must_use]
    pub fn store(&self) -> &UserStoreClient {
        &self.inner.store
    }

    /// Ids with a delete in flight.
    #[must_use]
    pub fn pending_deletes(&self) -> &PendingDeletes {
        &self.inner.pending_deletes
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The full user list, from cache when present.
    ///
    /// # Errors
    ///
    /// Returns the store error if the list had to be fetched and the fetch failed.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, StoreError> {
        let store = &self.inner.store;
        let value = self
            .fetch(QueryKey::Users, || async move {
                debug!("Cache miss for users");
                let users = store.list_users().await?;
                Ok(QueryValue::Users(Arc::new(users)))
            })
            .await?;

        match value {
            QueryValue::Users(users) => Ok(users.as_ref().clone()),
            QueryValue::User(_) => Err(self.mismatch(QueryKey::Users).await),
        }
    }

    /// A single record, from cache when present. `Ok(None)` if the store has
    /// no such record.
    ///
    /// # Errors
    ///
    /// Returns the store error if the fetch failed.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let store = &self.inner.store;
        let value = self
            .fetch(QueryKey::User(id), || async move {
                debug!("Cache miss for user");
                let user = store.get_user(id).await?;
                Ok(QueryValue::User(user.map(Box::new)))
            })
            .await?;

        match value {
            QueryValue::User(user) => Ok(user.map(|boxed| *boxed)),
            QueryValue::Users(_) => Err(self.mismatch(QueryKey::User(id)).await),
        }
    }

    /// Read `key` through the cache, loading it with `load` on a miss.
    ///
    /// Entries loaded before the key was last invalidated are discarded and
    /// loaded again.
    async fn fetch<F, Fut>(&self, key: QueryKey, load: F) -> Result<QueryValue, StoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<QueryValue, StoreError>>,
    {
        let generations = &self.inner.generations;
        let mut attempt = 1;

        loop {
            let entry = self
                .inner
                .cache
                .try_get_with(key, async {
                    let generation = generations.current(key);
                    let value = load().await?;
                    Ok::<_, StoreError>(CachedEntry { generation, value })
                })
                .await
                .map_err(Arc::unwrap_or_clone)?;

            if entry.generation == generations.current(key) {
                return Ok(entry.value);
            }

            debug!(?key, attempt, "Discarding entry loaded before invalidation");
            self.inner.cache.invalidate(&key).await;

            if attempt >= MAX_FETCH_ATTEMPTS {
                return Ok(entry.value);
            }
            attempt += 1;
        }
    }

    /// Drop an entry whose value does not match its key.
    async fn mismatch(&self, key: QueryKey) -> StoreError {
        self.inner.cache.invalidate(&key).await;
        StoreError::Api(format!("Cached value for {key:?} has the wrong shape"))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a record and invalidate the list.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is invalidated on failure.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &UserFormData) -> Result<User, StoreError> {
        let user = self.inner.store.create_user(data).await?;

        self.invalidate(&[QueryKey::Users, QueryKey::User(user.id)])
            .await;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Update a record and invalidate both the list and the record.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is invalidated on failure.
    #[instrument(skip(self, data), fields(user_id = %id))]
    pub async fn update(&self, id: UserId, data: &UserFormData) -> Result<User, StoreError> {
        let user = self.inner.store.update_user(id, data).await?;

        self.invalidate(&[QueryKey::Users, QueryKey::User(id)]).await;
        info!("User updated");
        Ok(user)
    }

    /// Delete a record and invalidate both the list and the record.
    ///
    /// # Errors
    ///
    /// Returns the store error; nothing is invalidated on failure, so the
    /// cached list still shows the row.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.inner.store.delete_user(id).await?;

        self.invalidate(&[QueryKey::Users, QueryKey::User(id)]).await;
        info!("User deleted");
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    async fn invalidate(&self, keys: &[QueryKey]) {
        self.inner.generations.bump(keys);
        for key in keys {
            self.inner.cache.invalidate(key).await;
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.generations.bump_all();
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
