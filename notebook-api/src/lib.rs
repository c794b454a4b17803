//! # Notebook Web Server Library
//!
//! This library provides the HTTP layer of the notebook: a multi-user
//! note-taking and blog-post site with registration and login.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and login guard
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Form bodies and their validation rules
//! - `resources`: Per-kind labels, URLs and forms for notes and posts
//! - `routes`: Route handlers
//! - `views`: HTML rendering

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod resources;
pub mod routes;
pub mod views;
