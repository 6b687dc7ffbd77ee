//! Roster Core - Shared domain library for the Roster user admin.
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. The admin binary owns the network side (store adapter, cache)
//! and feeds snapshots of fetched data through the functions here.
//!
//! # Modules
//!
//! - [`types`] - Canonical `User`, form payload, id and email newtypes
//! - [`validation`] - Field rules for the user form
//! - [`form`] - Form state machine and the editable skills list
//! - [`listing`] - Sorting and pagination of the user list
//! - [`collation`] - Locale-aware string comparison

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod collation;
pub mod form;
pub mod listing;
pub mod types;
pub mod validation;

pub use collation::{Collation, CollationError};
pub use types::*;
