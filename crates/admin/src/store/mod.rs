//! REST adapter for the remote user store.
//!
//! The store exposes a single `/users` collection:
//!
//! ```text
//! GET    /users        - list all records
//! GET    /users/{id}   - fetch one record
//! POST   /users        - create (server assigns id)
//! PUT    /users/{id}   - replace editable fields
//! DELETE /users/{id}   - remove
//! ```
//!
//! Every record passes through [`normalize_user`] before it leaves this
//! module, and every failure is reported as a [`StoreError`].

mod client;
mod conversions;
mod error;
mod types;

pub use client::UserStoreClient;
pub use conversions::normalize_user;
pub use error::StoreError;
pub use types::{CreateUserBody, RawUser};
