//! Roster Admin library.
//!
//! This crate provides the admin panel as a library, allowing it to be
//! tested and reused:
//!
//! - [`store`]: REST adapter for the remote user store
//! - [`query`]: cached reads, invalidating mutations, pending deletes
//! - [`routes`]: axum handlers and askama templates
//! - [`config`]: environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod query;
pub mod routes;
pub mod state;
pub mod store;
