//! Core types for Roster.
//!
//! This module provides the canonical user model and type-safe wrappers for
//! ids and email addresses.

pub mod email;
pub mod id;
pub mod user;

pub use email::{Email, EmailError};
pub use id::{UserId, UserIdError};
pub use user::{User, UserFormData, now_timestamp, parse_timestamp};
