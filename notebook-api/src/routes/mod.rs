/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and logout pages
/// - `records`: Note and post pages, generic over the record kind

pub mod auth;
pub mod health;
pub mod records;
