//! # Task Manager Shared Library
//!
//! This crate contains the domain types, persistence layer and access rules
//! used by the Task Manager API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, statuses, labels, tasks)
//! - `db`: Connection pool and migrations
//! - `auth`: Password hashing, tokens, identity resolution and the guard layer
//! - `restriction`: Deletion preconditions based on task references
//! - `filter`: Task listing filter

pub mod auth;
pub mod db;
pub mod filter;
pub mod models;
pub mod restriction;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
