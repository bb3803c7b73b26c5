//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the API request/response types for their endpoints.

pub mod account;
pub mod entry;
pub mod session;
pub mod transfer;
pub mod user;
pub mod verify_email;
