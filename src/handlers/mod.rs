//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs validation and ownership checks
//! 3. Delegates to the store and returns an HTTP response

/// Account management endpoints
pub mod accounts;
/// Health check endpoint
pub mod health;
/// Access-token renewal endpoint
pub mod tokens;
/// Transfer endpoint
pub mod transfers;
/// User signup, login, role, and email verification endpoints
pub mod users;
