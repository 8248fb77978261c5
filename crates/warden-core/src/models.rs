//! Domain models for WARDEN.
//!
//! These are the core types shared across all crates.

pub mod role;
pub mod session;
pub mod user;
