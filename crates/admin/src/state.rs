//! Application state shared across handlers.

use std::sync::Arc;

use roster_core::listing::Pagination;
use roster_core::{Collation, CollationError};
use thiserror::Error;

use crate::config::AdminConfig;
use crate::query::UserQueries;
use crate::store::{StoreError, UserStoreClient};

/// Errors that can occur while building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create store client: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to load collation: {0}")]
    Collation(#[from] CollationError),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    queries: UserQueries,
    collation: Collation,
    pagination: Pagination,
}

impl AppState {
    /// Build the store client, query cache and collator from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built or the configured
    /// locale has no collation data.
    pub fn new(config: AdminConfig) -> Result<Self, StateError> {
        let store = UserStoreClient::new(&config.store)?;
        let queries = UserQueries::new(store, config.cache_capacity);
        let collation = Collation::for_locale(&config.locale)?;
        let pagination = Pagination::new(config.page_size);

        tracing::info!(
            store_url = %config.store.base_url,
            locale = %collation.locale(),
            page_size = pagination.page_size(),
            "Application state created"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                queries,
                collation,
                pagination,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn queries(&self) -> &UserQueries {
        &self.inner.queries
    }

    #[must_use]
    pub fn collation(&self) -> &Collation {
        &self.inner.collation
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.inner.pagination
    }
}
