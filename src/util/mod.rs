//! Shared utilities: password hashing and random value generation.

pub mod password;
pub mod random;
