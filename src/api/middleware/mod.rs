//! Middleware for protected routes.

pub mod auth;
