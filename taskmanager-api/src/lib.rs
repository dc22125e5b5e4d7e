//! # Task Manager API Server Library
//!
//! HTTP surface of the task manager: every handler resolves the actor,
//! runs the guard layer and, for deletes, the restriction policy before it
//! touches the store.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `notice`: User-facing notices on successful mutations
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod notice;
pub mod routes;
