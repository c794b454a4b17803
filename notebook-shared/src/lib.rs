//! # Notebook Shared Library
//!
//! Storage and authentication for the notebook web application: everything
//! below the HTTP layer.
//!
//! ## Module Organization
//!
//! - `db`: SQLite pool and embedded migrations
//! - `models`: Database models (users, sessions, notes, posts, authors)
//! - `auth`: Password hashing, session tokens and request authentication

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the notebook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
